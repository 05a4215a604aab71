//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use reqtrack_core::config::AppConfig;
use reqtrack_core::traits::LogBuffer;
use reqtrack_database::DatabasePool;
use reqtrack_database::repositories::RequestLogRepository;
use reqtrack_track::RequestRecorder;
use reqtrack_worker::BufferFlusher;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool wrapper
    pub db: DatabasePool,
    /// The per-request recording pipeline
    pub recorder: Arc<RequestRecorder>,
    /// The shared entry buffer; present only when buffering is enabled
    pub buffer: Option<Arc<dyn LogBuffer>>,
    /// Batch flusher; present only when buffering is enabled
    pub flusher: Option<Arc<BufferFlusher>>,
    /// Request log repository for the admin read/prune surface
    pub log_repo: Arc<RequestLogRepository>,
}
