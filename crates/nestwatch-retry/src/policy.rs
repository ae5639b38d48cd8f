//! Combines a backoff strategy with an optional predicate for which errors
//! are worth retrying.

use crate::backoff::IntervalFunction;
use std::sync::Arc;
use std::time::Duration;

/// Classifies an error as retryable or not. `None` means "retry everything",
/// matching the teacher's default of retrying any `Err`.
pub type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct RetryPolicy<E> {
    interval_fn: Arc<dyn IntervalFunction>,
    pub(crate) retry_predicate: Option<RetryPredicate<E>>,
}

impl<E> RetryPolicy<E> {
    pub fn new(interval_fn: impl IntervalFunction + 'static) -> Self {
        Self {
            interval_fn: Arc::new(interval_fn),
            retry_predicate: None,
        }
    }

    pub fn with_predicate(mut self, predicate: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        self.retry_predicate = Some(Arc::new(predicate));
        self
    }

    pub fn should_retry(&self, error: &E) -> bool {
        match &self.retry_predicate {
            Some(predicate) => predicate(error),
            None => true,
        }
    }

    pub fn next_backoff(&self, attempt: usize) -> Duration {
        self.interval_fn.interval(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::FixedInterval;

    #[test]
    fn default_policy_retries_everything() {
        let policy: RetryPolicy<&str> = RetryPolicy::new(FixedInterval::new(Duration::from_millis(10)));
        assert!(policy.should_retry(&"any error"));
        assert_eq!(policy.next_backoff(0), Duration::from_millis(10));
    }

    #[test]
    fn predicate_filters_errors() {
        let policy = RetryPolicy::new(FixedInterval::new(Duration::from_millis(10)))
            .with_predicate(|e: &&str| *e == "retryable");
        assert!(policy.should_retry(&"retryable"));
        assert!(!policy.should_retry(&"permanent"));
    }
}
