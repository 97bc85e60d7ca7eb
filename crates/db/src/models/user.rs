//! User entity model and DTOs.

use caravel_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub created_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub is_verified: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The password arrives already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
}
