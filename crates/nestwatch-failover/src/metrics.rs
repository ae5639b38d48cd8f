//! Per-endpoint rolling metrics: response time and success/failure, the raw
//! material rule evaluation reads `response_time`/`error_rate`/`availability`
//! from.

use nestwatch_core::RollingWindow;
use std::time::{Duration, Instant};

const METRICS_WINDOW: Duration = Duration::from_secs(5 * 60);

pub struct EndpointMetrics {
    response_times: RollingWindow<f64>,
    outcomes: RollingWindow<bool>,
}

impl EndpointMetrics {
    pub fn new() -> Self {
        Self {
            response_times: RollingWindow::new(METRICS_WINDOW),
            outcomes: RollingWindow::new(METRICS_WINDOW),
        }
    }

    pub fn record(&mut self, success: bool, response_time: Option<Duration>, now: Instant) {
        self.outcomes.push(success, now);
        if let Some(rt) = response_time {
            self.response_times.push(rt.as_secs_f64(), now);
        }
    }

    pub fn response_time_avg(&self, now: Instant) -> Option<Duration> {
        self.response_times.average(now).map(Duration::from_secs_f64)
    }

    pub fn error_rate(&self, now: Instant) -> f64 {
        let total = self.outcomes.len(now);
        if total == 0 {
            return 0.0;
        }
        let failures = self.outcomes.samples(now).filter(|s| !s.value).count();
        failures as f64 / total as f64
    }

    pub fn availability(&self, now: Instant) -> f64 {
        1.0 - self.error_rate(now)
    }

    pub fn sample_count(&self, now: Instant) -> usize {
        self.outcomes.len(now)
    }
}

impl Default for EndpointMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_rate_reflects_recent_failures() {
        let mut metrics = EndpointMetrics::new();
        let now = Instant::now();
        metrics.record(true, Some(Duration::from_millis(50)), now);
        metrics.record(false, None, now);
        metrics.record(false, None, now);
        metrics.record(false, None, now);
        metrics.record(false, None, now);

        assert_eq!(metrics.error_rate(now), 0.8);
        assert_eq!(metrics.availability(now), 0.2);
    }

    #[test]
    fn empty_window_has_zero_error_rate() {
        let metrics = EndpointMetrics::new();
        assert_eq!(metrics.error_rate(Instant::now()), 0.0);
    }
}
