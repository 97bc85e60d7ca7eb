//! Transfer entity model and DTOs.

use caravel_core::localization::TransferLocalization;
use caravel_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Full transfer row from the `transfers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transfer {
    pub id: DbId,
    pub total_price: f64,
    pub reservation_price: f64,
    pub date: Timestamp,
    pub localizations: Json<Vec<TransferLocalization>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new transfer.
#[derive(Debug)]
pub struct CreateTransfer {
    pub localizations: Vec<TransferLocalization>,
    pub date: Timestamp,
    pub total_price: f64,
    pub reservation_price: f64,
}

/// DTO for partially updating a transfer. `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct UpdateTransfer {
    pub localizations: Option<Vec<TransferLocalization>>,
    pub date: Option<Timestamp>,
    pub total_price: Option<f64>,
    pub reservation_price: Option<f64>,
}
