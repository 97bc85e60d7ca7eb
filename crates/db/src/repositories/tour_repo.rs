//! Repository for the `tours` table.

use caravel_core::localization::TourLocalization;
use caravel_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::tour::{CreateTour, Tour, TourPage, TourSummary, UpdateTour};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, total_price, reservation_price, duration, localizations, \
                       image, gallery, is_public, created_at, updated_at";

/// Advisory lock key serializing the localized-name collision check with
/// the insert, so two concurrent creates cannot both pass the check.
const TOUR_NAME_LOCK_KEY: i64 = 0x6361_7261_7665_6c31;

/// Containment scan: does any existing tour carry one of these names in any
/// of its localization entries? Matches are exact per entry, not
/// case-normalized.
const NAME_EXISTS_SQL: &str = "SELECT EXISTS ( \
    SELECT 1 FROM tours \
    WHERE localizations @> ANY ( \
        SELECT jsonb_build_array(jsonb_build_object('name', name))::jsonb \
        FROM unnest($1::text[]) AS name \
    ))";

/// SQL expression trimming `t.localizations` to the locale bound at `param`.
///
/// A requested locale with no match resolves to an empty list; with no
/// locale bound the full list passes through.
fn localized_slice_expr(param: &str) -> String {
    format!(
        "CASE WHEN {param}::text IS NOT NULL THEN \
            COALESCE((SELECT jsonb_agg(loc) \
                      FROM jsonb_array_elements(t.localizations) loc \
                      WHERE loc->>'locale' = {param}), '[]'::jsonb) \
         ELSE t.localizations END"
    )
}

/// Map the accepted sort keys onto column identifiers. Caller-supplied text
/// never reaches the SQL string; unknown keys fall back to recency.
fn order_clause(sort_by: &str, sort_order: &str) -> String {
    let column = match sort_by {
        "total_price" => "t.total_price",
        "duration" => "t.duration",
        _ => "t.created_at",
    };
    let direction = match sort_order {
        "asc" => "ASC",
        _ => "DESC",
    };
    format!("{column} {direction}")
}

/// List row carrying the window-function row count alongside the entity.
#[derive(FromRow)]
struct TourSummaryRow {
    id: DbId,
    total_price: f64,
    reservation_price: f64,
    duration: f64,
    localizations: Json<Vec<TourLocalization>>,
    image: Option<String>,
    is_public: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
    total_count: i64,
}

/// Provides CRUD operations for tours.
pub struct TourRepo;

impl TourRepo {
    /// Check whether any existing tour already uses one of these localized
    /// names. Cheap pre-check; the authoritative check runs inside
    /// [`TourRepo::create`]'s transaction.
    pub async fn any_name_exists(pool: &PgPool, names: &[String]) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(NAME_EXISTS_SQL)
            .bind(names)
            .fetch_one(pool)
            .await
    }

    /// Insert a new tour, returning the created row.
    ///
    /// Returns `Ok(None)` when one of the localized names collides with an
    /// existing tour. The check and the insert run in one transaction
    /// serialized by an advisory lock, so concurrent creates cannot race
    /// past each other.
    pub async fn create(pool: &PgPool, input: &CreateTour) -> Result<Option<Tour>, sqlx::Error> {
        let names: Vec<String> = input
            .localizations
            .iter()
            .map(|loc| loc.name.clone())
            .collect();

        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(TOUR_NAME_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let exists: bool = sqlx::query_scalar(NAME_EXISTS_SQL)
            .bind(&names)
            .fetch_one(&mut *tx)
            .await?;
        if exists {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO tours \
                (id, localizations, duration, total_price, reservation_price, \
                 image, gallery, is_public) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let tour = sqlx::query_as::<_, Tour>(&query)
            .bind(Uuid::new_v4())
            .bind(Json(&input.localizations))
            .bind(input.duration)
            .bind(input.total_price)
            .bind(input.reservation_price)
            .bind(&input.image)
            .bind(&input.gallery)
            .bind(input.is_public)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(tour))
    }

    /// Page through tours, newest first by default.
    ///
    /// With a locale, only tours carrying that locale are returned and their
    /// localization list is trimmed to the single matching entry.
    pub async fn list(
        pool: &PgPool,
        locale: Option<&str>,
        sort_by: &str,
        sort_order: &str,
        limit: i64,
        offset: i64,
    ) -> Result<TourPage, sqlx::Error> {
        let locale_filter = if locale.is_some() {
            "WHERE EXISTS (SELECT 1 FROM jsonb_array_elements(t.localizations) loc \
                           WHERE loc->>'locale' = $1)"
        } else {
            ""
        };

        let query = format!(
            "SELECT t.id, t.total_price, t.reservation_price, t.duration, \
                    {localizations} AS localizations, \
                    t.image, t.is_public, t.created_at, t.updated_at, \
                    COUNT(*) OVER() AS total_count \
             FROM tours t \
             {locale_filter} \
             ORDER BY {order} \
             LIMIT $2 OFFSET $3",
            localizations = localized_slice_expr("$1"),
            order = order_clause(sort_by, sort_order),
        );

        let rows = sqlx::query_as::<_, TourSummaryRow>(&query)
            .bind(locale)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total = rows.first().map_or(0, |row| row.total_count);
        let tours = rows
            .into_iter()
            .map(|row| TourSummary {
                id: row.id,
                total_price: row.total_price,
                reservation_price: row.reservation_price,
                duration: row.duration,
                localizations: row.localizations,
                image: row.image,
                is_public: row.is_public,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect();

        Ok(TourPage { tours, total })
    }

    /// Find a tour by ID, optionally trimming localizations to one locale.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        locale: Option<&str>,
    ) -> Result<Option<Tour>, sqlx::Error> {
        let query = format!(
            "SELECT t.id, t.total_price, t.reservation_price, t.duration, \
                    {localizations} AS localizations, \
                    t.image, t.gallery, t.is_public, t.created_at, t.updated_at \
             FROM tours t \
             WHERE t.id = $1",
            localizations = localized_slice_expr("$2"),
        );
        sqlx::query_as::<_, Tour>(&query)
            .bind(id)
            .bind(locale)
            .fetch_optional(pool)
            .await
    }

    /// Update a tour. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTour,
    ) -> Result<Option<Tour>, sqlx::Error> {
        let query = format!(
            "UPDATE tours SET \
                localizations = COALESCE($2, localizations), \
                duration = COALESCE($3, duration), \
                total_price = COALESCE($4, total_price), \
                reservation_price = COALESCE($5, reservation_price), \
                is_public = COALESCE($6, is_public), \
                image = COALESCE($7, image), \
                gallery = COALESCE($8, gallery), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tour>(&query)
            .bind(id)
            .bind(input.localizations.as_ref().map(Json))
            .bind(input.duration)
            .bind(input.total_price)
            .bind(input.reservation_price)
            .bind(input.is_public)
            .bind(&input.image)
            .bind(&input.gallery)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tour by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tours WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
