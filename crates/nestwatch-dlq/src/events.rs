//! Events published by the dead-letter queue.

use nestwatch_core::events::ResilienceEvent;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum DlqEvent {
    MessageRetryScheduled {
        timestamp: Instant,
        original_queue: String,
        retry_count: u32,
    },
    MessagePermanentlyFailed {
        timestamp: Instant,
        original_queue: String,
        error_class: String,
    },
    SaturationAlert {
        timestamp: Instant,
        error_class: String,
        permanent_failure_count: u64,
    },
}

impl ResilienceEvent for DlqEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DlqEvent::MessageRetryScheduled { .. } => "message_retry_scheduled",
            DlqEvent::MessagePermanentlyFailed { .. } => "message_permanently_failed",
            DlqEvent::SaturationAlert { .. } => "dlq_saturation_alert",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            DlqEvent::MessageRetryScheduled { timestamp, .. }
            | DlqEvent::MessagePermanentlyFailed { timestamp, .. }
            | DlqEvent::SaturationAlert { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        "dead-letter-queue"
    }
}
