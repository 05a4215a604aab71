//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match state.db.health_check().await {
        Ok(true) => "connected",
        _ => "unreachable",
    };

    let buffer = match &state.buffer {
        Some(buffer) => match buffer.health_check().await {
            Ok(true) => "connected",
            _ => "unreachable",
        },
        None => "disabled",
    };

    let status = if database == "connected" && buffer != "unreachable" {
        "ok"
    } else {
        "degraded"
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        buffer: buffer.to_string(),
    }))
}
