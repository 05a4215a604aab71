//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reqtrack_entity::request_log::RequestLogWithIp;
use reqtrack_worker::FlushOutcome;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health probe response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Database reachability.
    pub database: String,
    /// Buffer reachability, `"disabled"` in direct mode.
    pub buffer: String,
}

/// One request log row for presentation, with the effective IP resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntryResponse {
    /// Log entry id.
    pub id: Uuid,
    /// Effective client IP (registry, inline, or the unknown sentinel).
    pub ip: String,
    /// Principal id, null for anonymous.
    pub user_id: Option<Uuid>,
    /// User agent.
    pub user_agent: String,
    /// Request path.
    pub route: String,
    /// HTTP method.
    pub method: String,
    /// Raw query string.
    pub query_params: String,
    /// Response status code.
    pub status_code: i32,
    /// Capture timestamp.
    pub requested_at: DateTime<Utc>,
    /// Originating application name.
    pub app_name: Option<String>,
    /// Captured headers.
    pub headers: Option<serde_json::Value>,
}

impl From<RequestLogWithIp> for LogEntryResponse {
    fn from(row: RequestLogWithIp) -> Self {
        let ip = row.effective_ip().to_string();
        Self {
            id: row.id,
            ip,
            user_id: row.user_id,
            user_agent: row.user_agent,
            route: row.route,
            method: row.method,
            query_params: row.query_params,
            status_code: row.status_code,
            requested_at: row.requested_at,
            app_name: row.app_name,
            headers: row.headers,
        }
    }
}

/// Result of a manual flush.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlushResponse {
    /// Records written to the store.
    pub logs_processed: u64,
    /// New IP registry rows created.
    pub ips_created: u64,
    /// Malformed entries dropped.
    pub skipped: u64,
}

impl From<FlushOutcome> for FlushResponse {
    fn from(outcome: FlushOutcome) -> Self {
        match outcome {
            FlushOutcome::Empty => Self {
                logs_processed: 0,
                ips_created: 0,
                skipped: 0,
            },
            FlushOutcome::Completed {
                logs_processed,
                ips_created,
                skipped,
            } => Self {
                logs_processed,
                ips_created,
                skipped,
            },
        }
    }
}

/// Result of a retention prune.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneResponse {
    /// Entries deleted.
    pub deleted: u64,
}
