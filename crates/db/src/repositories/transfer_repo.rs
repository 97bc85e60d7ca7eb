//! Repository for the `transfers` table.

use caravel_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::transfer::{CreateTransfer, Transfer, UpdateTransfer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, total_price, reservation_price, date, localizations, created_at, updated_at";

/// SQL expression trimming `t.localizations` to the locale bound at `$1`.
const LOCALIZED_SLICE: &str = "CASE WHEN $1::text IS NOT NULL THEN \
        COALESCE((SELECT jsonb_agg(loc) \
                  FROM jsonb_array_elements(t.localizations) loc \
                  WHERE loc->>'locale' = $1), '[]'::jsonb) \
     ELSE t.localizations END";

/// Provides CRUD operations for transfers.
pub struct TransferRepo;

impl TransferRepo {
    /// Insert a new transfer, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTransfer) -> Result<Transfer, sqlx::Error> {
        let query = format!(
            "INSERT INTO transfers (id, localizations, date, total_price, reservation_price) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transfer>(&query)
            .bind(Uuid::new_v4())
            .bind(Json(&input.localizations))
            .bind(input.date)
            .bind(input.total_price)
            .bind(input.reservation_price)
            .fetch_one(pool)
            .await
    }

    /// List all transfers, newest first.
    ///
    /// With a locale, only transfers carrying that locale are returned and
    /// their localization list is trimmed to the single matching entry.
    pub async fn list(pool: &PgPool, locale: Option<&str>) -> Result<Vec<Transfer>, sqlx::Error> {
        let locale_filter = if locale.is_some() {
            "WHERE EXISTS (SELECT 1 FROM jsonb_array_elements(t.localizations) loc \
                           WHERE loc->>'locale' = $1)"
        } else {
            ""
        };
        let query = format!(
            "SELECT t.id, t.total_price, t.reservation_price, t.date, \
                    {LOCALIZED_SLICE} AS localizations, \
                    t.created_at, t.updated_at \
             FROM transfers t \
             {locale_filter} \
             ORDER BY t.created_at DESC"
        );
        sqlx::query_as::<_, Transfer>(&query)
            .bind(locale)
            .fetch_all(pool)
            .await
    }

    /// Update a transfer. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTransfer,
    ) -> Result<Option<Transfer>, sqlx::Error> {
        let query = format!(
            "UPDATE transfers SET \
                localizations = COALESCE($2, localizations), \
                date = COALESCE($3, date), \
                total_price = COALESCE($4, total_price), \
                reservation_price = COALESCE($5, reservation_price), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transfer>(&query)
            .bind(id)
            .bind(input.localizations.as_ref().map(Json))
            .bind(input.date)
            .bind(input.total_price)
            .bind(input.reservation_price)
            .fetch_optional(pool)
            .await
    }

    /// Delete a transfer by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM transfers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
