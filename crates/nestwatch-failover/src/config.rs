//! Controller-wide configuration: sampling/detection cadence and the cap on
//! simultaneously in-flight failovers.

use std::time::Duration;

pub struct FailoverConfig {
    pub(crate) health_check_interval: Duration,
    pub(crate) health_check_timeout: Duration,
    pub(crate) detection_interval: Duration,
    pub(crate) max_concurrent_failovers: usize,
}

impl FailoverConfig {
    pub fn builder() -> FailoverConfigBuilder {
        FailoverConfigBuilder::new()
    }
}

pub struct FailoverConfigBuilder {
    health_check_interval: Duration,
    health_check_timeout: Duration,
    detection_interval: Duration,
    max_concurrent_failovers: usize,
}

impl FailoverConfigBuilder {
    pub fn new() -> Self {
        Self {
            health_check_interval: Duration::from_secs(15),
            health_check_timeout: Duration::from_secs(5),
            detection_interval: Duration::from_secs(10),
            max_concurrent_failovers: 5,
        }
    }

    /// How often every endpoint is GET-probed. Default: 15s.
    pub fn health_check_interval(mut self, interval: Duration) -> Self {
        self.health_check_interval = interval;
        self
    }

    /// Per-probe deadline. Default: 5s.
    pub fn health_check_timeout(mut self, timeout: Duration) -> Self {
        self.health_check_timeout = timeout;
        self
    }

    /// How often trigger conditions are re-evaluated against rolling metrics.
    /// Default: 10s.
    pub fn detection_interval(mut self, interval: Duration) -> Self {
        self.detection_interval = interval;
        self
    }

    /// Upper bound on failovers running at once. Default: 5.
    pub fn max_concurrent_failovers(mut self, max: usize) -> Self {
        self.max_concurrent_failovers = max;
        self
    }

    pub fn build(self) -> FailoverConfig {
        assert!(self.max_concurrent_failovers > 0, "max_concurrent_failovers must be > 0");
        assert!(
            self.health_check_timeout <= self.health_check_interval,
            "health_check_timeout {:?} must not exceed health_check_interval {:?}",
            self.health_check_timeout,
            self.health_check_interval
        );

        FailoverConfig {
            health_check_interval: self.health_check_interval,
            health_check_timeout: self.health_check_timeout,
            detection_interval: self.detection_interval,
            max_concurrent_failovers: self.max_concurrent_failovers,
        }
    }
}

impl Default for FailoverConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = FailoverConfig::builder().build();
        assert_eq!(config.max_concurrent_failovers, 5);
    }

    #[test]
    #[should_panic(expected = "must not exceed")]
    fn build_panics_when_timeout_exceeds_interval() {
        FailoverConfig::builder()
            .health_check_interval(Duration::from_secs(1))
            .health_check_timeout(Duration::from_secs(2))
            .build();
    }
}
