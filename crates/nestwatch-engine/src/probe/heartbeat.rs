//! `heartbeat`: no network I/O — compares a stored `lastHeartbeat` timestamp
//! against `expectedInterval + tolerance`.

use super::{Probe, ProbeOutcome};
use crate::error::ProbeError;
use nestwatch_registry::ServiceDescriptor;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Reads the last-seen heartbeat timestamp for a service. Backed by
/// `nestwatch-storage` in production; swappable for tests.
pub trait HeartbeatSource: Send + Sync {
    fn last_heartbeat(&self, service_id: &str) -> Pin<Box<dyn Future<Output = Option<SystemTime>> + Send + '_>>;
}

/// Reports no heartbeat ever seen; used when no real source is wired up.
pub struct NoOpHeartbeatSource;

impl HeartbeatSource for NoOpHeartbeatSource {
    fn last_heartbeat(&self, _service_id: &str) -> Pin<Box<dyn Future<Output = Option<SystemTime>> + Send + '_>> {
        Box::pin(async { None })
    }
}

pub struct HeartbeatProbe {
    source: Arc<dyn HeartbeatSource>,
}

impl HeartbeatProbe {
    pub fn new(source: Arc<dyn HeartbeatSource>) -> Self {
        Self { source }
    }
}

impl Probe for HeartbeatProbe {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        _deadline: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<ProbeOutcome, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let expected_interval = descriptor
                .type_config
                .get("expected_interval_secs")
                .and_then(|v| v.as_u64())
                .map(Duration::from_secs)
                .unwrap_or(descriptor.interval);
            let tolerance = descriptor
                .type_config
                .get("tolerance_secs")
                .and_then(|v| v.as_u64())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(0));

            let last = self.source.last_heartbeat(&descriptor.service_id).await;
            match last {
                None => Ok(ProbeOutcome::down("no heartbeat recorded yet")),
                Some(last) => {
                    let age = SystemTime::now().duration_since(last).unwrap_or(Duration::ZERO);
                    if age <= expected_interval + tolerance {
                        Ok(ProbeOutcome::up(format!("heartbeat age {age:?}"), age))
                    } else {
                        Ok(ProbeOutcome::down(format!("heartbeat deadline missed, age {age:?}")))
                    }
                }
            }
        })
    }
}
