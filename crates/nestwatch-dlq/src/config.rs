//! Configuration for the dead-letter queue.

use crate::events::DlqEvent;
use nestwatch_core::events::{EventListeners, FnListener};
use nestwatch_retry::ExponentialBackoff;
use std::time::Duration;

#[derive(Clone)]
pub struct DlqConfig {
    pub(crate) max_retries: u32,
    pub(crate) backoff: ExponentialBackoff,
    pub(crate) dlq_message_ttl: Duration,
    pub(crate) saturation_threshold: u64,
    pub(crate) event_listeners: EventListeners<DlqEvent>,
}

impl DlqConfig {
    pub fn builder() -> DlqConfigBuilder {
        DlqConfigBuilder::new()
    }
}

pub struct DlqConfigBuilder {
    max_retries: u32,
    backoff: ExponentialBackoff,
    dlq_message_ttl: Duration,
    saturation_threshold: u64,
    event_listeners: EventListeners<DlqEvent>,
}

impl DlqConfigBuilder {
    pub fn new() -> Self {
        Self {
            max_retries: 5,
            backoff: ExponentialBackoff::new(Duration::from_secs(1)).with_max(Duration::from_secs(300)),
            dlq_message_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            saturation_threshold: 100,
            event_listeners: EventListeners::new(),
        }
    }

    /// Messages are parked as a permanent failure once `retryCount` reaches
    /// this value.
    ///
    /// Default: 5
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// The `.retry` queue's expiration policy: `min(base * factor^retryCount, maxDelay)`.
    pub fn backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Bounds worst-case growth of the `.dlq` queue.
    ///
    /// Default: 7 days
    pub fn dlq_message_ttl(mut self, ttl: Duration) -> Self {
        self.dlq_message_ttl = ttl;
        self
    }

    /// Permanent-failure count per error class that triggers a saturation alert.
    ///
    /// Default: 100
    pub fn saturation_threshold(mut self, threshold: u64) -> Self {
        self.saturation_threshold = threshold;
        self
    }

    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&DlqEvent) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(f));
        self
    }

    pub fn build(self) -> DlqConfig {
        DlqConfig {
            max_retries: self.max_retries,
            backoff: self.backoff,
            dlq_message_ttl: self.dlq_message_ttl,
            saturation_threshold: self.saturation_threshold,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for DlqConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
