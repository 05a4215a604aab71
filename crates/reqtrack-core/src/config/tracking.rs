//! Request tracking policy configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which class of principals should have their requests logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserLoggingMode {
    /// Log requests from everyone.
    #[default]
    All,
    /// Log only requests carrying an authenticated principal.
    Authenticated,
    /// Log only anonymous requests.
    Anonymous,
}

/// Policy and capture configuration for the request tracking pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Header names to capture on each logged request (matched
    /// case-insensitively, stored under their lowercase form).
    #[serde(default)]
    pub headers_to_log: Vec<String>,
    /// Path prefixes that are always logged, regardless of the user-mode
    /// and exclude filters.
    #[serde(default)]
    pub force_paths: Vec<String>,
    /// Path prefixes that are never logged. The wildcard `"*"` excludes
    /// everything.
    #[serde(default)]
    pub exclude_paths: Vec<String>,
    /// Which principals to log requests for.
    #[serde(default)]
    pub user_logging_mode: UserLoggingMode,
    /// Probability in [0, 1] that an otherwise-eligible request is logged.
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,
    /// Apply the sampling draw to force-path requests as well.
    #[serde(default)]
    pub force_paths_sampling: bool,
    /// Normalized IP storage: deduplicate IPs into the registry table and
    /// reference them by id. When false the IP string is stored inline on
    /// each log row.
    #[serde(default = "default_true")]
    pub use_ip_address_model: bool,
    /// Optional name identifying the originating application.
    #[serde(default)]
    pub app_name: Option<String>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            headers_to_log: Vec::new(),
            force_paths: Vec::new(),
            exclude_paths: Vec::new(),
            user_logging_mode: UserLoggingMode::default(),
            sampling_rate: default_sampling_rate(),
            force_paths_sampling: false,
            use_ip_address_model: true,
            app_name: None,
        }
    }
}

impl TrackingConfig {
    /// Reject sampling rates outside [0, 1].
    pub fn validate(&self) -> Result<(), AppError> {
        if !(0.0..=1.0).contains(&self.sampling_rate) {
            return Err(AppError::configuration(format!(
                "tracking.sampling_rate must be within [0, 1], got {}",
                self.sampling_rate
            )));
        }
        Ok(())
    }
}

fn default_sampling_rate() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}
