//! Repository for the `email_verification` table.

use caravel_core::verification::CODE_TTL_MINUTES;
use sqlx::PgPool;

use crate::models::verification::EmailVerification;

/// Provides storage for one outstanding verification code per email.
pub struct VerificationRepo;

impl VerificationRepo {
    /// Find the outstanding code record for an email, expired or not.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<EmailVerification>, sqlx::Error> {
        sqlx::query_as::<_, EmailVerification>(
            "SELECT email, code, created_at FROM email_verification WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Store a fresh code for an email, replacing any existing record.
    pub async fn upsert(pool: &PgPool, email: &str, code: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO email_verification (email, code, created_at) \
             VALUES ($1, $2, NOW()) \
             ON CONFLICT (email) DO UPDATE SET code = $2, created_at = NOW()",
        )
        .bind(email)
        .bind(code)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove the record for an email. Returns `true` if one existed.
    pub async fn delete(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM email_verification WHERE email = $1")
            .bind(email)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically consume a code: the delete only matches when the stored
    /// code equals `code` AND is still inside its validity window, so a
    /// wrong code and an expired one are indistinguishable to the caller.
    ///
    /// Returns `true` when the code was valid (and is now gone).
    pub async fn consume(pool: &PgPool, email: &str, code: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM email_verification \
             WHERE email = $1 AND code = $2 \
               AND created_at > NOW() - make_interval(mins => $3::int)",
        )
        .bind(email)
        .bind(code)
        .bind(CODE_TTL_MINUTES as i32)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
