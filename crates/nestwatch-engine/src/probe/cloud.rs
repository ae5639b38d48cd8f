//! `aws-health` / `azure-health` / `gcp-health`: provider outage status for a
//! configured region/service. Actual cloud SDK integration is out of scope —
//! only the contract is modeled, behind an injected [`CloudHealthProvider`].

use super::{Probe, ProbeOutcome};
use crate::error::ProbeError;
use nestwatch_registry::ServiceDescriptor;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderHealth {
    NoIssues,
    Advisory(String),
    ActiveOutage(String),
}

/// Queries a cloud provider's status endpoint for a region/service.
/// Implementations live outside this crate (or in tests, as a stub) since
/// talking to an actual AWS/Azure/GCP health API requires provider-specific
/// credentials and SDKs.
pub trait CloudHealthProvider: Send + Sync {
    fn check(&self, provider: &str, target: &str) -> Pin<Box<dyn Future<Output = Result<ProviderHealth, ProbeError>> + Send + '_>>;
}

/// A provider that always reports no issues; used when no real provider is
/// wired up yet.
pub struct NoOpCloudHealthProvider;

impl CloudHealthProvider for NoOpCloudHealthProvider {
    fn check(&self, _provider: &str, _target: &str) -> Pin<Box<dyn Future<Output = Result<ProviderHealth, ProbeError>> + Send + '_>> {
        Box::pin(async { Ok(ProviderHealth::NoIssues) })
    }
}

pub struct CloudHealthProbe {
    provider: Arc<dyn CloudHealthProvider>,
}

impl CloudHealthProbe {
    pub fn new(provider: Arc<dyn CloudHealthProvider>) -> Self {
        Self { provider }
    }
}

impl Probe for CloudHealthProbe {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        _deadline: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<ProbeOutcome, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let provider_name = descriptor.service_type.name();
            match self.provider.check(provider_name, &descriptor.target).await? {
                ProviderHealth::NoIssues => Ok(ProbeOutcome::up("no active issues", Duration::ZERO)),
                ProviderHealth::Advisory(msg) => Ok(ProbeOutcome::degraded(msg, Duration::ZERO)),
                ProviderHealth::ActiveOutage(msg) => Ok(ProbeOutcome::down(msg)),
            }
        })
    }
}
