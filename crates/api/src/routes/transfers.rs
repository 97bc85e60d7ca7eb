//! Route definitions for transfers.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::transfers;
use crate::state::AppState;

/// Routes mounted at `/transfers`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(transfers::list).post(transfers::create))
        .route(
            "/{id}",
            put(transfers::update).delete(transfers::delete),
        )
}
