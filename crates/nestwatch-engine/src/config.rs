//! Engine-wide configuration: dispatcher concurrency, reference URLs for the
//! connectivity guard, and its suppression window.

use crate::connectivity_guard::{DEFAULT_SUPPRESSION_WINDOW, MAX_SUPPRESSION_WINDOW};
use std::time::Duration;

pub struct EngineConfig {
    pub(crate) concurrent_checks: usize,
    pub(crate) reference_urls: Vec<String>,
    pub(crate) suppression_window: Duration,
    pub(crate) startup_jitter_max: Duration,
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }
}

pub struct EngineConfigBuilder {
    concurrent_checks: usize,
    reference_urls: Vec<String>,
    suppression_window: Duration,
    startup_jitter_max: Duration,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self {
            concurrent_checks: 50,
            reference_urls: vec!["https://www.google.com".to_string(), "https://www.cloudflare.com".to_string()],
            suppression_window: DEFAULT_SUPPRESSION_WINDOW,
            startup_jitter_max: Duration::from_secs(5),
        }
    }

    /// Maximum in-flight probes across all services. Default: 50.
    pub fn concurrent_checks(mut self, n: usize) -> Self {
        self.concurrent_checks = n;
        self
    }

    /// URLs the connectivity guard probes before declaring an environment
    /// unreachable. Default: a couple of well-known, highly-available sites.
    pub fn reference_urls(mut self, urls: Vec<String>) -> Self {
        self.reference_urls = urls;
        self
    }

    /// How long status-change alerts are suppressed after an
    /// environment-unreachable verdict. Default: 5 minutes.
    pub fn suppression_window(mut self, window: Duration) -> Self {
        self.suppression_window = window;
        self
    }

    /// Upper bound on the random first-fire delay used to avoid a
    /// thundering herd of schedulers at startup. Default: 5s.
    pub fn startup_jitter_max(mut self, max: Duration) -> Self {
        self.startup_jitter_max = max;
        self
    }

    pub fn build(self) -> EngineConfig {
        assert!(
            self.suppression_window <= MAX_SUPPRESSION_WINDOW,
            "suppression_window {:?} exceeds the hard maximum of {:?}",
            self.suppression_window,
            MAX_SUPPRESSION_WINDOW
        );
        assert!(self.concurrent_checks > 0, "concurrent_checks must be > 0");

        EngineConfig {
            concurrent_checks: self.concurrent_checks,
            reference_urls: self.reference_urls,
            suppression_window: self.suppression_window,
            startup_jitter_max: self.startup_jitter_max,
        }
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "exceeds the hard maximum")]
    fn build_panics_past_the_suppression_ceiling() {
        EngineConfig::builder().suppression_window(Duration::from_secs(60 * 60)).build();
    }

    #[test]
    fn defaults_are_sane() {
        let config = EngineConfig::builder().build();
        assert_eq!(config.concurrent_checks, 50);
    }
}
