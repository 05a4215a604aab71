//! Request DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reqtrack_core::types::pagination::PageRequest;
use reqtrack_database::repositories::LogSearchFilter;
use reqtrack_entity::request_log::StatusBand;

/// Query parameters for browsing the request log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogListQuery {
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
    /// Exact HTTP method filter.
    pub method: Option<String>,
    /// Status band filter (`2xx`, `3xx`, `4xx`, `5xx`).
    pub band: Option<StatusBand>,
    /// Route prefix filter.
    pub route: Option<String>,
    /// Principal filter.
    pub user_id: Option<Uuid>,
}

impl LogListQuery {
    /// Split into the repository filter and page request.
    pub fn into_parts(self) -> (LogSearchFilter, PageRequest) {
        let defaults = PageRequest::default();
        let page = PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.page_size.unwrap_or(defaults.page_size),
        );
        let filter = LogSearchFilter {
            method: self.method,
            band: self.band,
            route_prefix: self.route,
            user_id: self.user_id,
        };
        (filter, page)
    }
}

/// Body for the retention prune endpoint. At least one strategy must be
/// given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneRequest {
    /// Delete entries older than this many days.
    pub max_age_days: Option<i64>,
    /// Keep only this many most recent entries.
    pub keep_most_recent: Option<i64>,
}

/// Body for the manual flush endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlushRequest {
    /// Cap on entries drained this cycle; everything when omitted.
    pub max_items: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults_and_clamping() {
        let (filter, page) = LogListQuery::default().into_parts();
        assert_eq!(page.page, 1);
        assert!(filter.method.is_none());

        let (_, page) = LogListQuery {
            page: Some(0),
            page_size: Some(10_000),
            ..LogListQuery::default()
        }
        .into_parts();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 100);
    }

    #[test]
    fn band_deserializes_from_query_form() {
        let query: LogListQuery = serde_json::from_value(serde_json::json!({
            "band": "4xx",
            "method": "GET"
        }))
        .unwrap();
        assert_eq!(query.band, Some(StatusBand::ClientError));
    }
}
