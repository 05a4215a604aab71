//! Structured log entry assembly.

use std::collections::BTreeMap;

use chrono::Utc;

use reqtrack_core::config::tracking::TrackingConfig;
use reqtrack_core::types::envelope::LogEnvelope;
use reqtrack_core::types::record::IpSlot;

use crate::ip::client_ip;
use crate::request::{CapturedRequest, Principal};

/// Field bound on the captured user agent.
const USER_AGENT_MAX_CHARS: usize = 300;

/// Assembles the structured log record from request/response/principal
/// context. Deterministic given its inputs except for the capture-time
/// timestamp.
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    config: TrackingConfig,
}

impl EntryBuilder {
    /// Create a builder over the given tracking configuration.
    pub fn new(config: TrackingConfig) -> Self {
        Self { config }
    }

    /// Build the entry for one request/response pair.
    pub fn build(
        &self,
        request: &CapturedRequest,
        status_code: u16,
        principal: &Principal,
    ) -> LogEnvelope {
        let ip = client_ip(request);
        LogEnvelope {
            ip: IpSlot::from_captured(&ip, self.config.use_ip_address_model),
            user_id: principal.user_id(),
            user_agent: truncate_chars(
                request.header("user-agent").unwrap_or(""),
                USER_AGENT_MAX_CHARS,
            ),
            route: request.path.clone(),
            method: request.method.clone(),
            query_params: request.query.clone(),
            status_code: i32::from(status_code),
            requested_at: Utc::now(),
            app_name: self.config.app_name.clone(),
            headers: self.logged_headers(request),
        }
    }

    /// Capture the allow-listed headers present on the request, keyed by
    /// their canonical lowercase name. Absent headers are omitted rather
    /// than recorded as empty; an empty allow-list captures nothing.
    fn logged_headers(&self, request: &CapturedRequest) -> Option<BTreeMap<String, String>> {
        if self.config.headers_to_log.is_empty() {
            return None;
        }
        Some(
            self.config
                .headers_to_log
                .iter()
                .filter_map(|name| {
                    let canonical = name.to_ascii_lowercase();
                    request
                        .header(&canonical)
                        .map(|value| (canonical.clone(), value.to_string()))
                })
                .collect(),
        )
    }
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
