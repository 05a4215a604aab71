//! Scheduled log retention.

use chrono::{Duration, Utc};
use tracing::info;

use reqtrack_core::config::worker::RetentionConfig;
use reqtrack_core::result::AppResult;
use reqtrack_database::repositories::RequestLogRepository;

/// Prunes the request log per the configured retention policy.
///
/// Both strategies can be active at once: the age cutoff runs first,
/// then the row-count cap is applied to what remains.
#[derive(Debug, Clone)]
pub struct RetentionTask {
    logs: RequestLogRepository,
    config: RetentionConfig,
}

impl RetentionTask {
    pub fn new(logs: RequestLogRepository, config: RetentionConfig) -> Self {
        Self { logs, config }
    }

    /// Run one retention pass. Returns the total number of entries deleted.
    pub async fn run(&self) -> AppResult<u64> {
        let mut deleted = 0u64;

        if let Some(max_age_days) = self.config.max_age_days {
            let cutoff = Utc::now() - Duration::days(max_age_days);
            let removed = self.logs.delete_older_than(cutoff).await?;
            info!(removed, max_age_days, "Deleted log entries past the age cutoff");
            deleted += removed;
        }

        if let Some(keep) = self.config.keep_most_recent {
            let removed = self.logs.keep_most_recent(keep).await?;
            info!(removed, keep, "Trimmed log to the most recent entries");
            deleted += removed;
        }

        Ok(deleted)
    }
}
