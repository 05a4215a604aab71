//! Admin handlers for browsing and maintaining the request log.

use axum::Json;
use axum::extract::{Query, State};
use chrono::{Duration, Utc};
use tracing::info;

use reqtrack_core::error::AppError;
use reqtrack_core::types::pagination::PageResponse;

use crate::dto::request::{FlushRequest, LogListQuery, PruneRequest};
use crate::dto::response::{ApiResponse, FlushResponse, LogEntryResponse, PruneResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/admin/logs
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogListQuery>,
) -> Result<Json<ApiResponse<PageResponse<LogEntryResponse>>>, ApiError> {
    let (filter, page) = query.into_parts();
    let result = state.log_repo.search(&filter, &page).await?;

    let entries: Vec<LogEntryResponse> =
        result.items.into_iter().map(LogEntryResponse::from).collect();
    let page_out = PageResponse::new(
        entries,
        result.page,
        result.page_size,
        result.total_items,
    );

    Ok(Json(ApiResponse::ok(page_out)))
}

/// POST /api/admin/logs/prune
pub async fn prune_logs(
    State(state): State<AppState>,
    Json(body): Json<PruneRequest>,
) -> Result<Json<ApiResponse<PruneResponse>>, ApiError> {
    if body.max_age_days.is_none() && body.keep_most_recent.is_none() {
        return Err(AppError::validation(
            "Provide max_age_days and/or keep_most_recent",
        )
        .into());
    }
    if body.max_age_days.is_some_and(|days| days < 0) {
        return Err(AppError::validation("max_age_days must be non-negative").into());
    }
    if body.keep_most_recent.is_some_and(|keep| keep < 0) {
        return Err(AppError::validation("keep_most_recent must be non-negative").into());
    }

    let mut deleted = 0u64;
    if let Some(days) = body.max_age_days {
        let cutoff = Utc::now() - Duration::days(days);
        deleted += state.log_repo.delete_older_than(cutoff).await?;
    }
    if let Some(keep) = body.keep_most_recent {
        deleted += state.log_repo.keep_most_recent(keep).await?;
    }

    info!(deleted, "Pruned request log entries");
    Ok(Json(ApiResponse::ok(PruneResponse { deleted })))
}

/// POST /api/admin/flush
pub async fn flush_buffer(
    State(state): State<AppState>,
    Json(body): Json<FlushRequest>,
) -> Result<Json<ApiResponse<FlushResponse>>, ApiError> {
    let flusher = state
        .flusher
        .as_ref()
        .ok_or_else(|| AppError::validation("Buffering is disabled; nothing to flush"))?;

    let outcome = flusher.flush(body.max_items).await?;
    Ok(Json(ApiResponse::ok(FlushResponse::from(outcome))))
}
