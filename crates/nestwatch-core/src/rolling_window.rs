//! A small time-bounded sample buffer.
//!
//! Shared by the connectivity guard, the circuit breaker's time-based
//! window, and the failover controller's per-endpoint metrics, so the
//! "keep the last `duration` worth of samples" logic exists exactly once.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Sample<T> {
    pub at: Instant,
    pub value: T,
}

/// Holds samples whose age is `<= window`; older entries are dropped
/// lazily on the next push or query.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    window: Duration,
    samples: VecDeque<Sample<T>>,
}

impl<T: Copy> RollingWindow<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            samples: VecDeque::new(),
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.samples.push_back(Sample { at: now, value });
        self.evict(now);
    }

    fn evict(&mut self, now: Instant) {
        while let Some(front) = self.samples.front() {
            if now.saturating_duration_since(front.at) > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn samples(&self, now: Instant) -> impl Iterator<Item = &Sample<T>> {
        self.samples
            .iter()
            .filter(move |s| now.saturating_duration_since(s.at) <= self.window)
    }

    pub fn len(&self, now: Instant) -> usize {
        self.samples(now).count()
    }

    pub fn is_empty(&self, now: Instant) -> bool {
        self.len(now) == 0
    }
}

impl RollingWindow<f64> {
    pub fn average(&self, now: Instant) -> Option<f64> {
        let values: Vec<f64> = self.samples(now).map(|s| s.value).collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}
