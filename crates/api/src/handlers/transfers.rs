//! Handlers for the `/transfers` resource. Same CRUD shape as tours, minus
//! image handling and pagination.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use caravel_core::error::CoreError;
use caravel_core::localization::TransferLocalization;
use caravel_core::types::{DbId, Timestamp};
use caravel_db::models::transfer::{CreateTransfer, Transfer, UpdateTransfer};
use caravel_db::repositories::TransferRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::LocaleParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /transfers`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransferRequest {
    #[validate(
        length(min = 1, message = "At least one localization is required"),
        nested
    )]
    pub localizations: Vec<TransferLocalization>,
    pub date: Timestamp,
    #[validate(range(exclusive_min = 0.0, message = "Total price must be positive"))]
    pub total_price: f64,
    #[validate(range(exclusive_min = 0.0, message = "Reservation price must be positive"))]
    pub reservation_price: f64,
}

/// Request body for `PUT /transfers/{id}`. Absent fields stay untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTransferRequest {
    #[validate(
        length(min = 1, message = "At least one localization is required"),
        nested
    )]
    pub localizations: Option<Vec<TransferLocalization>>,
    pub date: Option<Timestamp>,
    #[validate(range(exclusive_min = 0.0, message = "Total price must be positive"))]
    pub total_price: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "Reservation price must be positive"))]
    pub reservation_price: Option<f64>,
}

/// Payload of `DELETE /transfers/{id}`.
#[derive(Debug, Serialize)]
pub struct DeletedTransfer {
    pub id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/transfers
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTransferRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Transfer>>)> {
    input.validate()?;

    let create = CreateTransfer {
        localizations: input.localizations,
        date: input.date,
        total_price: input.total_price,
        reservation_price: input.reservation_price,
    };
    let transfer = TransferRepo::create(&state.pool, &create).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: transfer })))
}

/// GET /api/v1/transfers
///
/// Full list, newest first. With `locale`, only transfers carrying that
/// locale are returned, trimmed to the single matching entry.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<LocaleParams>,
) -> AppResult<Json<DataResponse<Vec<Transfer>>>> {
    params.validate()?;

    let transfers = TransferRepo::list(&state.pool, params.locale.as_deref()).await?;
    Ok(Json(DataResponse { data: transfers }))
}

/// PUT /api/v1/transfers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTransferRequest>,
) -> AppResult<Json<DataResponse<Transfer>>> {
    input.validate()?;

    let update = UpdateTransfer {
        localizations: input.localizations,
        date: input.date,
        total_price: input.total_price,
        reservation_price: input.reservation_price,
    };
    let transfer = TransferRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Transfer",
            id,
        }))?;

    Ok(Json(DataResponse { data: transfer }))
}

/// DELETE /api/v1/transfers/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletedTransfer>>> {
    let deleted = TransferRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Transfer",
            id,
        }));
    }
    Ok(Json(DataResponse {
        data: DeletedTransfer { id },
    }))
}
