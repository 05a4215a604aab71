//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background flush worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduled flush worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the periodic buffer flush.
    #[serde(default = "default_flush_schedule")]
    pub flush_schedule: String,
    /// Maximum entries drained per flush cycle. `None` drains everything.
    #[serde(default)]
    pub flush_max_items: Option<u64>,
    /// Scheduled retention maintenance.
    #[serde(default)]
    pub retention: RetentionConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            flush_schedule: default_flush_schedule(),
            flush_max_items: None,
            retention: RetentionConfig::default(),
        }
    }
}

/// Scheduled log retention configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Whether the retention job runs on a schedule.
    #[serde(default)]
    pub enabled: bool,
    /// Cron expression for the retention job.
    #[serde(default = "default_retention_schedule")]
    pub schedule: String,
    /// Delete log entries older than this many days.
    #[serde(default)]
    pub max_age_days: Option<i64>,
    /// Keep only this many most recent log entries.
    #[serde(default)]
    pub keep_most_recent: Option<i64>,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            schedule: default_retention_schedule(),
            max_age_days: None,
            keep_most_recent: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Every minute.
fn default_flush_schedule() -> String {
    "0 * * * * *".to_string()
}

/// Daily at 3 AM.
fn default_retention_schedule() -> String {
    "0 0 3 * * *".to_string()
}
