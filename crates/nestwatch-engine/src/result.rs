//! `CheckResult`: the probe's semantic verdict, distinct from the transport
//! outcome that got it there.

use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Up,
    Down,
    Degraded,
    Unknown,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CheckResult {
    pub service_id: String,
    pub nest_id: String,
    pub status: CheckStatus,
    pub message: String,
    pub response_time: Option<Duration>,
    pub timestamp: SystemTime,
    pub check_duration: Duration,
    /// Which attempt (1-indexed) produced this result.
    pub attempt: u32,
    pub metadata: serde_json::Value,
}
