use std::sync::Arc;

use caravel_core::media::MediaStore;
use caravel_mail::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: caravel_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Image blob store backing the tour create/update flows.
    pub media: Arc<MediaStore>,
    /// SMTP mailer; `None` when `SMTP_HOST` is unset, in which case
    /// verification codes are stored but dispatch is skipped.
    pub mailer: Option<Arc<Mailer>>,
}
