//! Pre-save log record value types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a captured IP address goes, decided at capture time.
///
/// Modeling the dual storage mode as a tagged variant makes the
/// "exactly one IP field populated" invariant a compile-time shape
/// instead of a runtime assumption over two nullable columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpSlot {
    /// Normalized mode: the IP string is resolved to a registry row and
    /// the record references it by id.
    Registry(String),
    /// Denormalized mode: the IP string is stored inline on the record.
    Inline(String),
    /// No IP could be determined for the request.
    Unknown,
}

impl IpSlot {
    /// Classify a captured IP string per the configured storage mode.
    /// An empty capture is `Unknown` in either mode.
    pub fn from_captured(ip: &str, use_registry: bool) -> Self {
        if ip.is_empty() {
            Self::Unknown
        } else if use_registry {
            Self::Registry(ip.to_string())
        } else {
            Self::Inline(ip.to_string())
        }
    }

    /// The IP string destined for the registry, if any.
    pub fn registry_ip(&self) -> Option<&str> {
        match self {
            Self::Registry(ip) => Some(ip),
            _ => None,
        }
    }
}

/// A log record ready for insertion.
///
/// At most one of `ip_id` / `ip_address` is set, per the [`IpSlot`] the
/// record was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRequestLog {
    /// Registry reference (normalized mode).
    pub ip_id: Option<Uuid>,
    /// Inline IP string (denormalized mode).
    pub ip_address: Option<String>,
    /// Authenticated principal id; `None` means anonymous.
    pub user_id: Option<Uuid>,
    /// User agent, truncated to 300 characters at capture time.
    pub user_agent: String,
    /// Request path.
    pub route: String,
    /// HTTP method.
    pub method: String,
    /// Raw encoded query string.
    pub query_params: String,
    /// Response status code.
    pub status_code: i32,
    /// Capture timestamp.
    pub requested_at: DateTime<Utc>,
    /// Originating application name.
    pub app_name: Option<String>,
    /// Captured allow-listed headers, keyed by lowercase name.
    pub headers: Option<BTreeMap<String, String>>,
}
