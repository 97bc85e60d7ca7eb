//! Shared query parameter types for API handlers.
//!
//! Sort keys and orders deserialize into closed enums, so caller text can
//! never reach a SQL string: the repository additionally maps each key
//! through a fixed allow-list.

use serde::Deserialize;
use validator::Validate;

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Accepted sort keys for the tour listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourSortKey {
    #[default]
    CreatedAt,
    TotalPrice,
    Duration,
}

impl TourSortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            TourSortKey::CreatedAt => "created_at",
            TourSortKey::TotalPrice => "total_price",
            TourSortKey::Duration => "duration",
        }
    }
}

/// Sort direction; descending (newest/highest first) by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Query parameters for `GET /tours`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TourListParams {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: i64,
    #[serde(default)]
    pub sort_by: TourSortKey,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[validate(length(min = 2, max = 5, message = "locale must be 2-5 characters"))]
    pub locale: Option<String>,
}

/// Optional locale filter shared by by-id queries and the transfer listing.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LocaleParams {
    #[validate(length(min = 2, max = 5, message = "locale must be 2-5 characters"))]
    pub locale: Option<String>,
}

/// Number of pages needed for `total` rows at `limit` rows per page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}
