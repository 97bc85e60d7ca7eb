//! Tour entity model and DTOs.

use caravel_core::localization::TourLocalization;
use caravel_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Full tour row from the `tours` table.
///
/// `localizations` may already be trimmed to a single locale when the row
/// came from a locale-filtered query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tour {
    pub id: DbId,
    pub total_price: f64,
    pub reservation_price: f64,
    pub duration: f64,
    pub localizations: Json<Vec<TourLocalization>>,
    pub image: Option<String>,
    /// Gallery blob URLs, insertion order preserved.
    pub gallery: Vec<String>,
    #[serde(rename = "public")]
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Tour row as returned by the paginated list query (no gallery).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TourSummary {
    pub id: DbId,
    pub total_price: f64,
    pub reservation_price: f64,
    pub duration: f64,
    pub localizations: Json<Vec<TourLocalization>>,
    pub image: Option<String>,
    #[serde(rename = "public")]
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One page of the tour listing plus the unpaginated row count.
#[derive(Debug)]
pub struct TourPage {
    pub tours: Vec<TourSummary>,
    pub total: i64,
}

/// DTO for inserting a new tour. Image fields carry already-persisted blob
/// URLs, never inline payloads.
#[derive(Debug)]
pub struct CreateTour {
    pub localizations: Vec<TourLocalization>,
    pub duration: f64,
    pub total_price: f64,
    pub reservation_price: f64,
    pub image: Option<String>,
    pub gallery: Vec<String>,
    pub is_public: bool,
}

/// DTO for partially updating a tour. `None` fields are left untouched.
///
/// `image` can only be replaced, never cleared; `gallery` carries the fully
/// recomputed list (deletions already applied, new URLs appended).
#[derive(Debug, Default)]
pub struct UpdateTour {
    pub localizations: Option<Vec<TourLocalization>>,
    pub duration: Option<f64>,
    pub total_price: Option<f64>,
    pub reservation_price: Option<f64>,
    pub is_public: Option<bool>,
    pub image: Option<String>,
    pub gallery: Option<Vec<String>>,
}
