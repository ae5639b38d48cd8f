//! Pure retry-vs-park decision logic, kept separate from the queue adapter
//! so it can be unit tested without any broker in the loop.

use crate::config::DlqConfig;
use crate::message::DlqHeaders;
use nestwatch_retry::IntervalFunction;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum DlqDecision {
    /// Republish to `.retry` with this expiration; the retry queue
    /// dead-letters back to the original queue once it elapses.
    Retry { expiration: Duration },
    /// `retryCount` has reached `maxRetries`: park permanently.
    PermanentFailure,
}

pub fn decide(config: &DlqConfig, headers: &DlqHeaders) -> DlqDecision {
    if headers.retry_count < config.max_retries {
        DlqDecision::Retry {
            expiration: config.backoff.interval(headers.retry_count as usize),
        }
    } else {
        DlqDecision::PermanentFailure
    }
}
