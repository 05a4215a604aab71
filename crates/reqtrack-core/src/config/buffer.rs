//! Redis buffer configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Buffered delivery configuration.
///
/// When enabled, logged entries are serialized and added to a shared Redis
/// set instead of being written to the database on the request path. The
/// batch flusher drains the set out-of-band.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BufferConfig {
    /// Enable buffered delivery through Redis.
    #[serde(default)]
    pub enabled: bool,
    /// Redis connection URL, e.g. `redis://localhost:6379/0`.
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Redis set key holding the buffered entries.
    #[serde(default)]
    pub redis_key: Option<String>,
}

impl BufferConfig {
    /// Fail fast when buffering is enabled but incompletely configured.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.enabled {
            return Ok(());
        }
        if self.redis_url.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::configuration(
                "Redis buffer is enabled but 'buffer.redis_url' is missing. \
                 Add a valid Redis URL (e.g. 'redis://localhost:6379/0') or \
                 set 'buffer.enabled' to false to disable buffering.",
            ));
        }
        if self.redis_key.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::configuration(
                "Redis buffer is enabled but 'buffer.redis_key' is missing. \
                 Specify the Redis set key name for storing buffered entries.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_buffer_needs_nothing() {
        assert!(BufferConfig::default().validate().is_ok());
    }

    #[test]
    fn enabled_buffer_requires_url_and_key() {
        let mut config = BufferConfig {
            enabled: true,
            redis_url: None,
            redis_key: Some("reqtrack:logs".to_string()),
        };
        assert!(config.validate().is_err());

        config.redis_url = Some("redis://localhost:6379/0".to_string());
        config.redis_key = None;
        assert!(config.validate().is_err());

        config.redis_key = Some("reqtrack:logs".to_string());
        assert!(config.validate().is_ok());
    }
}
