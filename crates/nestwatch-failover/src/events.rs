//! Events published by the failover controller.

use crate::types::FailoverEvent;
use nestwatch_core::ResilienceEvent;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    EndpointStatusChanged {
        pattern_name: String,
        timestamp: Instant,
        endpoint_id: String,
    },
    FailoverTriggered {
        pattern_name: String,
        timestamp: Instant,
        event: Box<FailoverEvent>,
    },
    FailoverCompleted {
        pattern_name: String,
        timestamp: Instant,
        event: Box<FailoverEvent>,
    },
    FailoverFailed {
        pattern_name: String,
        timestamp: Instant,
        event: Box<FailoverEvent>,
    },
    FailoverRecovered {
        pattern_name: String,
        timestamp: Instant,
        event: Box<FailoverEvent>,
    },
}

impl ResilienceEvent for ControllerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ControllerEvent::EndpointStatusChanged { .. } => "endpoint_status_changed",
            ControllerEvent::FailoverTriggered { .. } => "failover_triggered",
            ControllerEvent::FailoverCompleted { .. } => "failover_completed",
            ControllerEvent::FailoverFailed { .. } => "failover_failed",
            ControllerEvent::FailoverRecovered { .. } => "failover_recovered",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            ControllerEvent::EndpointStatusChanged { timestamp, .. }
            | ControllerEvent::FailoverTriggered { timestamp, .. }
            | ControllerEvent::FailoverCompleted { timestamp, .. }
            | ControllerEvent::FailoverFailed { timestamp, .. }
            | ControllerEvent::FailoverRecovered { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            ControllerEvent::EndpointStatusChanged { pattern_name, .. }
            | ControllerEvent::FailoverTriggered { pattern_name, .. }
            | ControllerEvent::FailoverCompleted { pattern_name, .. }
            | ControllerEvent::FailoverFailed { pattern_name, .. }
            | ControllerEvent::FailoverRecovered { pattern_name, .. } => pattern_name,
        }
    }
}
