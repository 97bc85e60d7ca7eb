//! Route definitions for the signup and sign-in flow.

use axum::routing::post;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /send-code   -> send_code (public)
/// POST /signup      -> signup (public)
/// POST /signin      -> signin (public)
/// POST /status      -> status (requires bearer token)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-code", post(users::send_code))
        .route("/signup", post(users::signup))
        .route("/signin", post(users::signin))
        .route("/status", post(users::status))
}
