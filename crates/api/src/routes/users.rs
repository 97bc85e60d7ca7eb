//! Route definitions for account lookup.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET /{id} -> get_by_id (requires bearer token, own account only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(users::get_by_id))
}
