//! Route definitions for tours.

use axum::routing::get;
use axum::Router;

use crate::handlers::tours;
use crate::state::AppState;

/// Routes mounted at `/tours`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tours::list).post(tours::create))
        .route(
            "/{id}",
            get(tours::get_by_id)
                .put(tours::update)
                .delete(tours::delete),
        )
}
