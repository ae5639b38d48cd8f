//! Events published by the monitoring engine.

use crate::result::CheckResult;
use nestwatch_core::ResilienceEvent;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum EngineEvent {
    CheckResult {
        pattern_name: String,
        timestamp: Instant,
        result: Box<CheckResult>,
    },
    StatusChanged {
        pattern_name: String,
        timestamp: Instant,
        service_id: String,
        consecutive_failures: u32,
    },
    EnvironmentUnreachable {
        pattern_name: String,
        timestamp: Instant,
        reference_failures: usize,
    },
    ScheduleTick {
        pattern_name: String,
        timestamp: Instant,
        service_id: String,
    },
}

impl ResilienceEvent for EngineEvent {
    fn event_type(&self) -> &'static str {
        match self {
            EngineEvent::CheckResult { .. } => "check_result",
            EngineEvent::StatusChanged { .. } => "status_changed",
            EngineEvent::EnvironmentUnreachable { .. } => "environment_unreachable",
            EngineEvent::ScheduleTick { .. } => "schedule_tick",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            EngineEvent::CheckResult { timestamp, .. }
            | EngineEvent::StatusChanged { timestamp, .. }
            | EngineEvent::EnvironmentUnreachable { timestamp, .. }
            | EngineEvent::ScheduleTick { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            EngineEvent::CheckResult { pattern_name, .. }
            | EngineEvent::StatusChanged { pattern_name, .. }
            | EngineEvent::EnvironmentUnreachable { pattern_name, .. }
            | EngineEvent::ScheduleTick { pattern_name, .. } => pattern_name,
        }
    }
}
