//! Data model for §3's endpoint/rule/event trio: owner maps keyed by id,
//! never cyclic references. Events are immutable once appended.

use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointStatus {
    Healthy,
    Degraded,
    Unhealthy,
    /// Operator-set; skipped entirely by health sampling and rule detection.
    Maintenance,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServiceEndpoint {
    pub id: String,
    pub name: String,
    pub url: String,
    pub health_check_path: String,
    pub region: String,
    /// Lower is preferred.
    pub priority: u32,
    pub capacity: u32,
    pub current_load: u32,
    pub status: EndpointStatus,
    pub last_health_check: Option<SystemTime>,
}

impl ServiceEndpoint {
    pub fn load_fraction(&self) -> f64 {
        if self.capacity == 0 {
            1.0
        } else {
            self.current_load as f64 / self.capacity as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMetric {
    ResponseTime,
    ErrorRate,
    Availability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl ComparisonOperator {
    pub fn holds(&self, observed: f64, threshold: f64) -> bool {
        match self {
            ComparisonOperator::GreaterThan => observed > threshold,
            ComparisonOperator::GreaterOrEqual => observed >= threshold,
            ComparisonOperator::LessThan => observed < threshold,
            ComparisonOperator::LessOrEqual => observed <= threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct TriggerCondition {
    pub metric: TriggerMetric,
    pub operator: ComparisonOperator,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct TriggerConditionSnapshot {
    pub metric: TriggerMetric,
    pub operator: ComparisonOperator,
    pub threshold: f64,
    pub observed: f64,
    pub holds: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    HighestPriority,
    LowestLoad,
    Random,
    ClosestRegion,
    RoundRobin,
    Custom,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailoverStrategyKind {
    Immediate,
    /// Redirects an increasing share over `steps` steps.
    Gradual { steps: u32 },
    /// Validates target readiness, then redirects in one switch.
    BlueGreen,
    /// Splits traffic at configured proportions, promotes after a success window.
    Canary { steps: u32 },
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStrategyKind {
    Manual,
    Automatic {
        consecutive_success_required: u32,
        recovery_delay: Duration,
        initial_percentage: u8,
        increment_percentage: u8,
        increment_interval: Duration,
    },
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FailoverRule {
    pub id: String,
    pub name: String,
    /// Regex over endpoint name; compiled once at registration.
    pub service_pattern: String,
    pub trigger_conditions: Vec<TriggerCondition>,
    pub failover_strategy: FailoverStrategyKind,
    pub recovery_strategy: RecoveryStrategyKind,
    pub cooldown_period: Duration,
    pub selection_mode: SelectionMode,
    pub priority: u32,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailoverEventStatus {
    Triggered,
    InProgress,
    Completed,
    Failed,
    Recovering,
    Recovered,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FailoverEvent {
    pub id: String,
    pub timestamp: SystemTime,
    pub rule_id: String,
    pub source_endpoint: String,
    pub target_endpoint: Option<String>,
    pub status: FailoverEventStatus,
    pub conditions_snapshot: Vec<TriggerConditionSnapshot>,
    pub affected_connections: u64,
    pub duration: Option<Duration>,
    pub recovered_at: Option<SystemTime>,
}
