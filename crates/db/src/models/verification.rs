//! Email verification-code record.

use caravel_core::types::Timestamp;
use sqlx::FromRow;

/// One outstanding verification code, keyed by email.
///
/// Never serialized into API responses; the code only ever leaves the
/// system inside the verification email.
#[derive(Debug, Clone, FromRow)]
pub struct EmailVerification {
    pub email: String,
    pub code: String,
    pub created_at: Timestamp,
}
