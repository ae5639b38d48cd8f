//! Dead-letter queue: per-consumer parking and delayed retry with
//! exponential backoff.
//!
//! Two companion queues exist per protected consumer: `.dlq` (parking) and
//! `.retry` (delayed). A failing consumer hands its message and headers to
//! [`DeadLetterQueue::handle_failure`], which decides whether to republish
//! to `.retry` with a computed expiration or park it as a permanent failure,
//! and performs the corresponding publish through an injected
//! [`QueueAdapter`]. The caller acknowledges the original message only after
//! this call returns `Ok` — the dead-letter queue never loses a message
//! before ack, and never retries one beyond `maxRetries`.

mod adapter;
mod config;
mod error;
mod events;
mod message;
mod policy;

pub use adapter::{InMemoryQueueAdapter, QueueAdapter};
pub use config::{DlqConfig, DlqConfigBuilder};
pub use error::{DlqError, Result};
pub use events::DlqEvent;
pub use message::DlqHeaders;
pub use policy::DlqDecision;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

/// Sampled, non-authoritative statistics: per-queue and per-error-class
/// permanent-failure counts and the average retry count observed.
#[derive(Debug, Default, Clone)]
pub struct DlqStats {
    pub permanent_failures_by_queue: HashMap<String, u64>,
    pub permanent_failures_by_error_class: HashMap<String, u64>,
    pub total_retries: u64,
    pub total_decisions: u64,
}

impl DlqStats {
    pub fn average_retry_count(&self) -> f64 {
        if self.total_decisions == 0 {
            0.0
        } else {
            self.total_retries as f64 / self.total_decisions as f64
        }
    }
}

pub struct DeadLetterQueue<A: QueueAdapter> {
    adapter: A,
    config: DlqConfig,
    stats: Mutex<DlqStats>,
}

impl<A: QueueAdapter> DeadLetterQueue<A> {
    pub fn new(adapter: A, config: DlqConfig) -> Self {
        Self {
            adapter,
            config,
            stats: Mutex::new(DlqStats::default()),
        }
    }

    /// Decides retry-vs-park for a failed message and performs the
    /// corresponding publish. Returns the decision so the caller can log or
    /// assert on it; the caller should only ack the original message after
    /// this returns `Ok`.
    pub async fn handle_failure(
        &self,
        headers: &DlqHeaders,
        error_class: &str,
    ) -> Result<DlqDecision> {
        let decision = policy::decide(&self.config, headers);

        {
            let mut stats = self.stats.lock().unwrap();
            stats.total_decisions += 1;
            stats.total_retries += headers.retry_count as u64;
        }

        match &decision {
            DlqDecision::Retry { expiration } => {
                self.adapter
                    .publish_retry(headers, *expiration)
                    .await
                    .map_err(DlqError::PublishFailed)?;
                self.config.event_listeners.emit(&DlqEvent::MessageRetryScheduled {
                    timestamp: Instant::now(),
                    original_queue: headers.original_queue.clone(),
                    retry_count: headers.retry_count,
                });
            }
            DlqDecision::PermanentFailure => {
                self.adapter
                    .publish_dlq(headers, self.config.dlq_message_ttl)
                    .await
                    .map_err(DlqError::PublishFailed)?;
                self.record_permanent_failure(headers, error_class);
            }
        }

        Ok(decision)
    }

    fn record_permanent_failure(&self, headers: &DlqHeaders, error_class: &str) {
        let count = {
            let mut stats = self.stats.lock().unwrap();
            *stats
                .permanent_failures_by_queue
                .entry(headers.original_queue.clone())
                .or_insert(0) += 1;
            let count = stats
                .permanent_failures_by_error_class
                .entry(error_class.to_string())
                .or_insert(0);
            *count += 1;
            *count
        };

        self.config.event_listeners.emit(&DlqEvent::MessagePermanentlyFailed {
            timestamp: Instant::now(),
            original_queue: headers.original_queue.clone(),
            error_class: error_class.to_string(),
        });

        if count >= self.config.saturation_threshold {
            self.config.event_listeners.emit(&DlqEvent::SaturationAlert {
                timestamp: Instant::now(),
                error_class: error_class.to_string(),
                permanent_failure_count: count,
            });
        }
    }

    pub fn stats(&self) -> DlqStats {
        self.stats.lock().unwrap().clone()
    }
}
