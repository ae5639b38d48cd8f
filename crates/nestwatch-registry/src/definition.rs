//! `ServiceDefinition`: the validated, persisted record of what to monitor.

use crate::error::{RegistryError, Result};
use crate::types::{validate_target, ServiceType};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BusinessImpact {
    Internal,
    CustomerFacing,
    RevenueImpacting,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Up,
    Down,
    Degraded,
    Maintenance,
    Unknown,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuietHours {
    pub start_hour_utc: u8,
    pub end_hour_utc: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertingPolicy {
    pub channels: Vec<String>,
    pub min_consecutive_failures: u32,
    pub alert_delay: Duration,
    pub recovery_delay: Duration,
    pub quiet_hours: Option<QuietHours>,
    pub escalation_ladder: Vec<Duration>,
}

impl Default for AlertingPolicy {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            min_consecutive_failures: 1,
            alert_delay: Duration::from_secs(0),
            recovery_delay: Duration::from_secs(0),
            quiet_hours: None,
            escalation_ladder: Vec::new(),
        }
    }
}

/// The runtime mutable shadow updated by the monitoring engine as results
/// arrive; not part of the validated definition itself.
#[derive(Debug, Clone)]
pub struct RuntimeShadow {
    pub last_status: ServiceStatus,
    pub last_check: Option<std::time::SystemTime>,
    pub status_message: Option<String>,
    pub response_time: Option<Duration>,
}

impl Default for RuntimeShadow {
    fn default() -> Self {
        Self {
            last_status: ServiceStatus::Unknown,
            last_check: None,
            status_message: None,
            response_time: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub id: String,
    pub nest_id: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub group: Option<String>,
    pub category: Option<String>,

    pub service_type: ServiceType,
    pub target: String,
    /// Raw per-type configuration; probe implementations in
    /// `nestwatch-engine` know how to interpret their own type's shape.
    pub type_config: serde_json::Value,

    pub interval: Duration,
    pub timeout: Duration,
    pub retries: u32,
    pub enabled: bool,

    pub alerting: AlertingPolicy,
    pub criticality: Criticality,
    pub business_impact: BusinessImpact,

    #[serde(skip, default)]
    pub runtime: RuntimeShadowSlot,
}

/// A cheap interior-mutability wrapper so `runtime` can be updated without
/// requiring the whole definition to be `&mut`.
#[derive(Debug, Clone, Default)]
pub struct RuntimeShadowSlot(std::sync::Arc<std::sync::Mutex<RuntimeShadow>>);

impl RuntimeShadowSlot {
    pub fn get(&self) -> RuntimeShadow {
        self.0.lock().unwrap().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut RuntimeShadow)) {
        f(&mut self.0.lock().unwrap())
    }
}

const MIN_INTERVAL: Duration = Duration::from_secs(30);
const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
const TAG_PATTERN_CHARS: &str = "abcdefghijklmnopqrstuvwxyz0123456789-_";

impl ServiceDefinition {
    /// Runs the per-type target validator plus the cross-cutting checks
    /// (interval bounds, tag naming pattern). Does not check the per-tenant
    /// cap, which requires registry-wide state.
    pub fn validate(&self) -> Result<()> {
        validate_target(&self.service_type, &self.target)?;

        if self.interval < MIN_INTERVAL || self.interval > MAX_INTERVAL {
            return Err(RegistryError::IntervalOutOfBounds(self.interval));
        }

        for tag in &self.tags {
            if !tag.chars().all(|c| TAG_PATTERN_CHARS.contains(c)) {
                return Err(RegistryError::TagPatternMismatch(tag.clone()));
            }
        }

        Ok(())
    }
}
