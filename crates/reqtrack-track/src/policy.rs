//! The logging decision engine.

use reqtrack_core::config::tracking::{TrackingConfig, UserLoggingMode};

use crate::request::Principal;

/// Decides, per request, whether a log entry should be recorded.
///
/// Rule evaluation order is fixed and load-bearing: force-paths exist to
/// guarantee visibility into critical endpoints regardless of the later
/// filters, the user-mode and exclude filters are coarse allow/deny
/// gates, and sampling is the final probabilistic throttle.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    config: TrackingConfig,
}

impl PolicyEngine {
    /// Create an engine over the given tracking configuration.
    pub fn new(config: TrackingConfig) -> Self {
        Self { config }
    }

    /// Decide whether to log, drawing the sampling value from the thread
    /// RNG.
    pub fn should_log(&self, path: &str, principal: &Principal) -> bool {
        self.evaluate(path, principal, rand::random::<f64>())
    }

    /// Decide whether to log with an explicit sampling draw in [0, 1).
    ///
    /// Pure and deterministic: identical inputs and an identical draw
    /// always yield the same decision.
    pub fn evaluate(&self, path: &str, principal: &Principal, draw: f64) -> bool {
        let rate = self.config.sampling_rate;

        // Force paths bypass every later filter.
        if self
            .config
            .force_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return if self.config.force_paths_sampling {
                Self::sample(rate, draw)
            } else {
                true
            };
        }

        match self.config.user_logging_mode {
            UserLoggingMode::Authenticated if !principal.is_authenticated() => return false,
            UserLoggingMode::Anonymous if principal.is_authenticated() => return false,
            _ => {}
        }

        if self
            .config
            .exclude_paths
            .iter()
            .any(|prefix| prefix == "*" || path.starts_with(prefix.as_str()))
        {
            return false;
        }

        Self::sample(rate, draw)
    }

    /// A rate of 1.0 (or above) always accepts; otherwise accept exactly
    /// when the uniform draw lands below the rate, so a rate of 0.0
    /// always rejects.
    fn sample(rate: f64, draw: f64) -> bool {
        rate >= 1.0 || draw < rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: TrackingConfig) -> PolicyEngine {
        PolicyEngine::new(config)
    }

    #[test]
    fn exclude_prefix_rejects_matching_paths() {
        // An excluded prefix suppresses everything beneath it.
        let policy = engine(TrackingConfig {
            exclude_paths: vec!["/admin".to_string()],
            ..TrackingConfig::default()
        });
        assert!(!policy.evaluate("/admin/x", &Principal::Anonymous, 0.5));
        assert!(policy.evaluate("/other", &Principal::Anonymous, 0.5));
    }

    #[test]
    fn wildcard_excludes_everything() {
        let policy = engine(TrackingConfig {
            exclude_paths: vec!["*".to_string()],
            ..TrackingConfig::default()
        });
        assert!(!policy.evaluate("/anything", &Principal::Anonymous, 0.5));
    }

    #[test]
    fn force_path_precedes_blanket_exclusion() {
        // A forced prefix wins even over a wildcard exclusion.
        let policy = engine(TrackingConfig {
            force_paths: vec!["/api/".to_string()],
            exclude_paths: vec!["*".to_string()],
            force_paths_sampling: false,
            sampling_rate: 0.0,
            ..TrackingConfig::default()
        });
        assert!(policy.evaluate("/api/x", &Principal::Anonymous, 0.99));
        assert!(!policy.evaluate("/web/x", &Principal::Anonymous, 0.99));
    }

    #[test]
    fn force_path_sampling_applies_the_draw() {
        let policy = engine(TrackingConfig {
            force_paths: vec!["/api/".to_string()],
            force_paths_sampling: true,
            sampling_rate: 0.5,
            ..TrackingConfig::default()
        });
        assert!(policy.evaluate("/api/x", &Principal::Anonymous, 0.25));
        assert!(!policy.evaluate("/api/x", &Principal::Anonymous, 0.75));
    }

    #[test]
    fn authenticated_mode_rejects_anonymous() {
        // Authenticated-only mode drops anonymous traffic.
        let policy = engine(TrackingConfig {
            user_logging_mode: UserLoggingMode::Authenticated,
            ..TrackingConfig::default()
        });
        let user = Principal::User(uuid::Uuid::new_v4());
        assert!(!policy.evaluate("/page", &Principal::Anonymous, 0.5));
        assert!(policy.evaluate("/page", &user, 0.5));
    }

    #[test]
    fn anonymous_mode_rejects_authenticated() {
        let policy = engine(TrackingConfig {
            user_logging_mode: UserLoggingMode::Anonymous,
            ..TrackingConfig::default()
        });
        let user = Principal::User(uuid::Uuid::new_v4());
        assert!(policy.evaluate("/page", &Principal::Anonymous, 0.5));
        assert!(!policy.evaluate("/page", &user, 0.5));
    }

    #[test]
    fn sampling_boundaries() {
        // Rate 0.0 rejects every non-forced request, rate 1.0 accepts.
        let zero = engine(TrackingConfig {
            sampling_rate: 0.0,
            ..TrackingConfig::default()
        });
        assert!(!zero.evaluate("/page", &Principal::Anonymous, 0.0));
        assert!(!zero.evaluate("/page", &Principal::Anonymous, 0.999));

        let one = engine(TrackingConfig {
            sampling_rate: 1.0,
            ..TrackingConfig::default()
        });
        assert!(one.evaluate("/page", &Principal::Anonymous, 0.0));
        assert!(one.evaluate("/page", &Principal::Anonymous, 0.999));
    }

    #[test]
    fn decision_is_deterministic_for_a_fixed_draw() {
        // Repeated calls with identical inputs and draw agree.
        let policy = engine(TrackingConfig {
            sampling_rate: 0.3,
            ..TrackingConfig::default()
        });
        let first = policy.evaluate("/page", &Principal::Anonymous, 0.2999);
        for _ in 0..10 {
            assert_eq!(
                policy.evaluate("/page", &Principal::Anonymous, 0.2999),
                first
            );
        }
        assert!(first);
    }
}
