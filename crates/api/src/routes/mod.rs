pub mod auth;
pub mod health;
pub mod tours;
pub mod transfers;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tours                       list (GET), create (POST)
/// /tours/{id}                  get, update (PUT), delete
///
/// /transfers                   list (GET), create (POST)
/// /transfers/{id}              update (PUT), delete
///
/// /auth/send-code              issue a signup verification code (public)
/// /auth/signup                 consume the code, create the account (public)
/// /auth/signin                 password sign-in, returns bearer token (public)
/// /auth/status                 decode the bearer token (requires auth)
///
/// /users/{id}                  own account lookup (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tours", tours::router())
        .nest("/transfers", transfers::router())
        .nest("/auth", auth::router())
        .nest("/users", users::router())
}
