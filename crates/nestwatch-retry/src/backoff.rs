//! Backoff strategies: pure functions from attempt number to delay.
//!
//! Kept as data (an `IntervalFunction` trait object), not control flow, so a
//! [`crate::RetryPolicy`] can be constructed once and shared across requests.

use rand::Rng;
use std::time::Duration;

/// Maps a zero-indexed attempt number to the delay before the next attempt.
pub trait IntervalFunction: Send + Sync {
    fn interval(&self, attempt: usize) -> Duration;
}

/// Same delay after every attempt.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval {
    delay: Duration,
}

impl FixedInterval {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl IntervalFunction for FixedInterval {
    fn interval(&self, _attempt: usize) -> Duration {
        self.delay
    }
}

/// `min(base, max)` — no growth. Used by the `immediate`/`fast` presets
/// where the base delay is already near zero.
#[derive(Debug, Clone, Copy)]
pub struct ImmediateInterval;

impl IntervalFunction for ImmediateInterval {
    fn interval(&self, _attempt: usize) -> Duration {
        Duration::ZERO
    }
}

/// `base + step * attempt`, capped at `max`.
#[derive(Debug, Clone, Copy)]
pub struct LinearInterval {
    base: Duration,
    step: Duration,
    max: Duration,
}

impl LinearInterval {
    pub fn new(base: Duration, step: Duration, max: Duration) -> Self {
        Self { base, step, max }
    }
}

impl IntervalFunction for LinearInterval {
    fn interval(&self, attempt: usize) -> Duration {
        let grown = self.base + self.step * attempt as u32;
        grown.min(self.max)
    }
}

/// `min(base * factor^attempt, max)`, matching the formula in the design
/// docs exactly.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialBackoff {
    base: Duration,
    factor: f64,
    max: Duration,
}

impl ExponentialBackoff {
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            factor: 2.0,
            max: Duration::from_secs(30),
        }
    }

    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    pub fn with_max(mut self, max: Duration) -> Self {
        self.max = max;
        self
    }

    pub fn delay_for(&self, attempt: usize) -> Duration {
        let scaled = self.base.as_secs_f64() * self.factor.powi(attempt as i32);
        Duration::from_secs_f64(scaled.min(self.max.as_secs_f64()))
    }
}

impl IntervalFunction for ExponentialBackoff {
    fn interval(&self, attempt: usize) -> Duration {
        self.delay_for(attempt)
    }
}

/// Exponential backoff with uniform jitter in `[0.5 * d, d]`.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialRandomBackoff {
    inner: ExponentialBackoff,
}

impl ExponentialRandomBackoff {
    pub fn new(base: Duration) -> Self {
        Self {
            inner: ExponentialBackoff::new(base),
        }
    }

    pub fn with_factor(mut self, factor: f64) -> Self {
        self.inner = self.inner.with_factor(factor);
        self
    }

    pub fn with_max(mut self, max: Duration) -> Self {
        self.inner = self.inner.with_max(max);
        self
    }
}

impl IntervalFunction for ExponentialRandomBackoff {
    fn interval(&self, attempt: usize) -> Duration {
        let d = self.inner.delay_for(attempt);
        let lower = d.as_secs_f64() * 0.5;
        let upper = d.as_secs_f64();
        if upper <= lower {
            return d;
        }
        let jittered = rand::rng().random_range(lower..=upper);
        Duration::from_secs_f64(jittered)
    }
}

/// A user-supplied backoff function.
pub struct FnInterval<F>(F)
where
    F: Fn(usize) -> Duration + Send + Sync;

impl<F> FnInterval<F>
where
    F: Fn(usize) -> Duration + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> IntervalFunction for FnInterval<F>
where
    F: Fn(usize) -> Duration + Send + Sync,
{
    fn interval(&self, attempt: usize) -> Duration {
        (self.0)(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_backoff_grows_and_caps() {
        let b = ExponentialBackoff::new(Duration::from_millis(100)).with_max(Duration::from_secs(1));
        assert_eq!(b.interval(0), Duration::from_millis(100));
        assert_eq!(b.interval(1), Duration::from_millis(200));
        assert_eq!(b.interval(2), Duration::from_millis(400));
        // 100ms * 2^10 would be ~102s, capped at 1s.
        assert_eq!(b.interval(10), Duration::from_secs(1));
    }

    #[test]
    fn jittered_backoff_stays_within_bounds() {
        let b = ExponentialRandomBackoff::new(Duration::from_millis(1000));
        for attempt in 0..5 {
            let d = b.interval(attempt);
            let base = b.inner.delay_for(attempt);
            assert!(d.as_secs_f64() >= base.as_secs_f64() * 0.5 - 1e-9);
            assert!(d.as_secs_f64() <= base.as_secs_f64() + 1e-9);
        }
    }

    #[test]
    fn linear_interval_caps_at_max() {
        let l = LinearInterval::new(Duration::from_millis(100), Duration::from_millis(100), Duration::from_millis(250));
        assert_eq!(l.interval(0), Duration::from_millis(100));
        assert_eq!(l.interval(1), Duration::from_millis(200));
        assert_eq!(l.interval(2), Duration::from_millis(250));
    }

    #[test]
    fn immediate_interval_is_zero() {
        assert_eq!(ImmediateInterval.interval(0), Duration::ZERO);
        assert_eq!(ImmediateInterval.interval(5), Duration::ZERO);
    }
}
