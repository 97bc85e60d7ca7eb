//! Handlers for the `/tours` resource.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use caravel_core::error::CoreError;
use caravel_core::localization::{localized_names, translations_map, TourLocalization, TourTranslation};
use caravel_core::types::DbId;
use caravel_db::models::tour::{CreateTour, Tour, TourSummary, UpdateTour};
use caravel_db::repositories::TourRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::{total_pages, LocaleParams, TourListParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /tours`.
///
/// `image` and `gallery` carry inline base64 data-URI payloads; they are
/// persisted to blob storage before the row is inserted.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTourRequest {
    #[validate(
        length(min = 1, message = "At least one localization is required"),
        nested
    )]
    pub localizations: Vec<TourLocalization>,
    #[validate(range(exclusive_min = 0.0, message = "Duration must be positive"))]
    pub duration: f64,
    #[validate(range(exclusive_min = 0.0, message = "Total price must be positive"))]
    pub total_price: f64,
    #[validate(range(exclusive_min = 0.0, message = "Reservation price must be positive"))]
    pub reservation_price: f64,
    pub image: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub public: bool,
}

/// Request body for `PUT /tours/{id}`.
///
/// Every field is optional; absent (or null) fields leave the stored value
/// untouched. `delete_images` lists gallery URLs to drop; deletions apply
/// before any new `gallery` payloads are appended.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTourRequest {
    #[validate(
        length(min = 1, message = "At least one localization is required"),
        nested
    )]
    pub localizations: Option<Vec<TourLocalization>>,
    #[validate(range(exclusive_min = 0.0, message = "Duration must be positive"))]
    pub duration: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "Total price must be positive"))]
    pub total_price: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "Reservation price must be positive"))]
    pub reservation_price: Option<f64>,
    pub image: Option<String>,
    pub gallery: Option<Vec<String>>,
    #[serde(rename = "deleteImages")]
    pub delete_images: Option<Vec<String>>,
    pub public: Option<bool>,
}

/// Pagination block of the tour listing response.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

/// Payload of `GET /tours`.
#[derive(Debug, Serialize)]
pub struct TourListResponse {
    pub tours: Vec<TourSummary>,
    pub pagination: Pagination,
}

/// Payload of `GET /tours/{id}`: the row plus a locale-keyed lookup of its
/// translatable fields.
#[derive(Debug, Serialize)]
pub struct TourDetailResponse {
    #[serde(flatten)]
    pub tour: Tour,
    pub translations: BTreeMap<String, TourTranslation>,
}

/// Payload of `DELETE /tours/{id}`.
#[derive(Debug, Serialize)]
pub struct DeletedTour {
    pub id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/tours
///
/// Creates a tour after a cross-locale name-collision check. Image payloads
/// are persisted to blob storage first; the collision check is re-run
/// atomically inside the insert transaction.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTourRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Tour>>)> {
    input.validate()?;

    // 1. Cheap pre-check so an obvious duplicate fails before any blob is
    //    written. The authoritative check runs inside the repo transaction.
    let names = localized_names(&input.localizations);
    if TourRepo::any_name_exists(&state.pool, &names).await? {
        return Err(duplicate_name());
    }

    // 2. Persist the main image and gallery payloads.
    let saved = state
        .media
        .save_images(Some(input.image.as_str()), &input.gallery)
        .await?;

    // 3. Insert; `None` means the name check failed inside the transaction.
    let create = CreateTour {
        localizations: input.localizations,
        duration: input.duration,
        total_price: input.total_price,
        reservation_price: input.reservation_price,
        image: saved.main_url,
        gallery: saved.gallery_urls,
        is_public: input.public,
    };
    let tour = TourRepo::create(&state.pool, &create)
        .await?
        .ok_or_else(duplicate_name)?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: tour })))
}

/// GET /api/v1/tours
///
/// Paginated listing. With `locale`, only tours carrying that locale are
/// returned, each trimmed to the single matching localization entry. An
/// empty page is a normal 200.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TourListParams>,
) -> AppResult<Json<DataResponse<TourListResponse>>> {
    params.validate()?;

    let offset = (params.page - 1) * params.limit;
    let page = TourRepo::list(
        &state.pool,
        params.locale.as_deref(),
        params.sort_by.as_str(),
        params.sort_order.as_str(),
        params.limit,
        offset,
    )
    .await?;

    let pagination = Pagination {
        total: page.total,
        page: params.page,
        limit: params.limit,
        total_pages: total_pages(page.total, params.limit),
    };

    Ok(Json(DataResponse {
        data: TourListResponse {
            tours: page.tours,
            pagination,
        },
    }))
}

/// GET /api/v1/tours/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<LocaleParams>,
) -> AppResult<Json<DataResponse<TourDetailResponse>>> {
    params.validate()?;

    let tour = TourRepo::find_by_id(&state.pool, id, params.locale.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tour", id }))?;

    let translations = translations_map(&tour.localizations.0);

    Ok(Json(DataResponse {
        data: TourDetailResponse { tour, translations },
    }))
}

/// PUT /api/v1/tours/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTourRequest>,
) -> AppResult<Json<DataResponse<Tour>>> {
    input.validate()?;

    // 1. Fetch the current row (full localization list, full gallery).
    let current = TourRepo::find_by_id(&state.pool, id, None)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tour", id }))?;

    // 2. Apply gallery deletions before any additions.
    let gallery_touched = input.gallery.is_some() || input.delete_images.is_some();
    let mut gallery = current.gallery.clone();
    if let Some(delete) = &input.delete_images {
        gallery.retain(|url| !delete.contains(url));
    }

    // 3. Persist any new inline payloads.
    let mut image_url = None;
    if input.image.is_some() || input.gallery.is_some() {
        let saved = state
            .media
            .save_images(
                input.image.as_deref(),
                input.gallery.as_deref().unwrap_or(&[]),
            )
            .await?;
        image_url = saved.main_url;
        gallery.extend(saved.gallery_urls);
    }

    // 4. Write the partial update; untouched fields stay as they are.
    let update = UpdateTour {
        localizations: input.localizations,
        duration: input.duration,
        total_price: input.total_price,
        reservation_price: input.reservation_price,
        is_public: input.public,
        image: image_url,
        gallery: gallery_touched.then_some(gallery),
    };
    let tour = TourRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tour", id }))?;

    Ok(Json(DataResponse { data: tour }))
}

/// DELETE /api/v1/tours/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletedTour>>> {
    let deleted = TourRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Tour", id }));
    }
    Ok(Json(DataResponse {
        data: DeletedTour { id },
    }))
}

fn duplicate_name() -> AppError {
    AppError::Core(CoreError::Conflict(
        "Tour with one of these names already exists".into(),
    ))
}
