//! Before flagging a whole wave of probes as down, opportunistically checks
//! a small set of reference URLs. If all of them fail too, the outage is
//! more likely in the environment than in any one target: status-change
//! alerts are suppressed for a bounded window, though results are still
//! recorded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Hard ceiling regardless of configuration, per the resolved open question
/// on suppression-window bounds.
pub const MAX_SUPPRESSION_WINDOW: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_SUPPRESSION_WINDOW: Duration = Duration::from_secs(5 * 60);

pub struct ConnectivityGuard {
    reference_urls: Vec<String>,
    suppression_window: Duration,
    suppressed_until_epoch_secs: AtomicU64,
    client: reqwest::Client,
}

impl ConnectivityGuard {
    pub fn new(reference_urls: Vec<String>, suppression_window: Duration) -> Self {
        Self {
            reference_urls,
            suppression_window: suppression_window.min(MAX_SUPPRESSION_WINDOW),
            suppressed_until_epoch_secs: AtomicU64::new(0),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .expect("reqwest client builds with static config"),
        }
    }

    /// Probes the reference set; if every one fails, opens the suppression
    /// window and returns `true` (an `environment-unreachable` event should
    /// be emitted by the caller, which holds the event bus).
    pub async fn check(&self) -> bool {
        if self.reference_urls.is_empty() {
            return false;
        }

        let mut failures = 0usize;
        for url in &self.reference_urls {
            match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => {}
                _ => failures += 1,
            }
        }

        if failures == self.reference_urls.len() {
            let until = now_epoch_secs() + self.suppression_window.as_secs();
            self.suppressed_until_epoch_secs.store(until, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Whether status-change alerts are currently suppressed.
    pub fn is_suppressing(&self) -> bool {
        now_epoch_secs() < self.suppressed_until_epoch_secs.load(Ordering::SeqCst)
    }
}

fn now_epoch_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppression_window_is_clamped_to_the_hard_max() {
        let guard = ConnectivityGuard::new(vec![], Duration::from_secs(60 * 60));
        assert_eq!(guard.suppression_window, MAX_SUPPRESSION_WINDOW);
    }

    #[tokio::test]
    async fn empty_reference_set_never_trips() {
        let guard = ConnectivityGuard::new(vec![], DEFAULT_SUPPRESSION_WINDOW);
        assert!(!guard.check().await);
        assert!(!guard.is_suppressing());
    }
}
