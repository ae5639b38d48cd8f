//! Lifecycle events published by the connection pool.

use nestwatch_core::events::ResilienceEvent;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum PoolEvent {
    ConnectionCreated {
        pattern_name: String,
        timestamp: Instant,
        pool_size: usize,
    },
    ConnectionDestroyed {
        pattern_name: String,
        timestamp: Instant,
        reason: DestroyReason,
    },
    AcquireSucceeded {
        pattern_name: String,
        timestamp: Instant,
        wait: Duration,
    },
    AcquireTimedOut {
        pattern_name: String,
        timestamp: Instant,
    },
    HealthCheckFailed {
        pattern_name: String,
        timestamp: Instant,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyReason {
    MaxLifetimeExceeded,
    IdleTimeoutExceeded,
    FailedValidation,
    PoolShrinking,
}

impl ResilienceEvent for PoolEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PoolEvent::ConnectionCreated { .. } => "connection_created",
            PoolEvent::ConnectionDestroyed { .. } => "connection_destroyed",
            PoolEvent::AcquireSucceeded { .. } => "acquire_succeeded",
            PoolEvent::AcquireTimedOut { .. } => "acquire_timed_out",
            PoolEvent::HealthCheckFailed { .. } => "health_check_failed",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            PoolEvent::ConnectionCreated { timestamp, .. }
            | PoolEvent::ConnectionDestroyed { timestamp, .. }
            | PoolEvent::AcquireSucceeded { timestamp, .. }
            | PoolEvent::AcquireTimedOut { timestamp, .. }
            | PoolEvent::HealthCheckFailed { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            PoolEvent::ConnectionCreated { pattern_name, .. }
            | PoolEvent::ConnectionDestroyed { pattern_name, .. }
            | PoolEvent::AcquireSucceeded { pattern_name, .. }
            | PoolEvent::AcquireTimedOut { pattern_name, .. }
            | PoolEvent::HealthCheckFailed { pattern_name, .. } => pattern_name,
        }
    }
}
