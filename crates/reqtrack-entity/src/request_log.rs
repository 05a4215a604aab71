//! Request log entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Sentinel returned when a log row carries no IP in either storage mode.
pub const UNKNOWN_IP: &str = "Unknown";

/// One immutable record per logged request.
///
/// Exactly one of `ip_id` / `ip_address` is populated, matching the IP
/// storage mode configured when the record was captured (both are null
/// only when no client IP could be determined).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RequestLog {
    /// Unique log entry identifier.
    pub id: Uuid,
    /// Registry reference (normalized mode).
    pub ip_id: Option<Uuid>,
    /// Inline IP string (denormalized mode).
    pub ip_address: Option<String>,
    /// The authenticated principal, null for anonymous requests. Cleared
    /// (not cascaded) when the principal is deleted.
    pub user_id: Option<Uuid>,
    /// User agent string, truncated to 300 characters at capture time.
    pub user_agent: String,
    /// Request path.
    pub route: String,
    /// HTTP method.
    pub method: String,
    /// Raw encoded query string.
    pub query_params: String,
    /// Response status code.
    pub status_code: i32,
    /// When the request was captured.
    pub requested_at: DateTime<Utc>,
    /// Originating application name.
    pub app_name: Option<String>,
    /// Captured allow-listed headers (JSONB).
    pub headers: Option<serde_json::Value>,
}

/// A log row joined with its registry IP for read-side presentation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RequestLogWithIp {
    /// Unique log entry identifier.
    pub id: Uuid,
    /// The registry IP string (normalized mode), joined from the registry.
    pub ip: Option<String>,
    /// Inline IP string (denormalized mode).
    pub ip_address: Option<String>,
    /// The authenticated principal, null for anonymous requests.
    pub user_id: Option<Uuid>,
    /// User agent string.
    pub user_agent: String,
    /// Request path.
    pub route: String,
    /// HTTP method.
    pub method: String,
    /// Raw encoded query string.
    pub query_params: String,
    /// Response status code.
    pub status_code: i32,
    /// When the request was captured.
    pub requested_at: DateTime<Utc>,
    /// Originating application name.
    pub app_name: Option<String>,
    /// Captured allow-listed headers (JSONB).
    pub headers: Option<serde_json::Value>,
}

impl RequestLogWithIp {
    /// The IP address from whichever storage mode populated this row:
    /// registry IP if present, else the inline IP, else [`UNKNOWN_IP`].
    pub fn effective_ip(&self) -> &str {
        self.ip
            .as_deref()
            .or(self.ip_address.as_deref())
            .unwrap_or(UNKNOWN_IP)
    }
}

/// Status code band for browsing filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusBand {
    /// 2xx responses.
    #[serde(rename = "2xx")]
    Success,
    /// 3xx responses.
    #[serde(rename = "3xx")]
    Redirect,
    /// 4xx responses.
    #[serde(rename = "4xx")]
    ClientError,
    /// 5xx responses.
    #[serde(rename = "5xx")]
    ServerError,
}

impl StatusBand {
    /// The half-open status code range `[lo, hi)` covered by this band.
    pub fn range(self) -> (i32, i32) {
        match self {
            Self::Success => (200, 300),
            Self::Redirect => (300, 400),
            Self::ClientError => (400, 500),
            Self::ServerError => (500, 600),
        }
    }

    /// Classify a status code, if it falls into a known band.
    pub fn of(status_code: i32) -> Option<Self> {
        match status_code {
            200..300 => Some(Self::Success),
            300..400 => Some(Self::Redirect),
            400..500 => Some(Self::ClientError),
            500..600 => Some(Self::ServerError),
            _ => None,
        }
    }
}
