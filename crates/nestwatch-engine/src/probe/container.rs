//! `kubernetes` / `docker`: expected number of pods/containers in a running
//! state. Talking to the Kubernetes API or Docker daemon is modeled behind
//! an injected provider rather than vendored here.

use super::{Probe, ProbeOutcome};
use crate::error::ProbeError;
use nestwatch_registry::ServiceDescriptor;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RunningCount {
    pub running: u32,
    pub expected: u32,
}

pub trait ContainerRuntimeProvider: Send + Sync {
    fn running_count(&self, runtime: &str, selector: &str) -> Pin<Box<dyn Future<Output = Result<RunningCount, ProbeError>> + Send + '_>>;
}

/// A provider that reports the expected count itself alongside the running
/// count, so this probe never needs a second config source; used when no
/// real runtime is wired up yet.
pub struct NoOpContainerRuntimeProvider;

impl ContainerRuntimeProvider for NoOpContainerRuntimeProvider {
    fn running_count(&self, _runtime: &str, _selector: &str) -> Pin<Box<dyn Future<Output = Result<RunningCount, ProbeError>> + Send + '_>> {
        Box::pin(async { Ok(RunningCount { running: 1, expected: 1 }) })
    }
}

pub struct ContainerProbe {
    provider: std::sync::Arc<dyn ContainerRuntimeProvider>,
}

impl ContainerProbe {
    pub fn new(provider: std::sync::Arc<dyn ContainerRuntimeProvider>) -> Self {
        Self { provider }
    }
}

impl Probe for ContainerProbe {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        _deadline: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<ProbeOutcome, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let runtime = descriptor.service_type.name();
            let RunningCount { running, expected } = self.provider.running_count(runtime, &descriptor.target).await?;

            if running == 0 {
                Ok(ProbeOutcome::down(format!("0/{expected} running")))
            } else if running < expected {
                Ok(ProbeOutcome::degraded(format!("{running}/{expected} running"), Duration::ZERO))
            } else {
                Ok(ProbeOutcome::up(format!("{running}/{expected} running"), Duration::ZERO))
            }
        })
    }
}
