//! The closed set of probe implementations, one per `ServiceType`.
//!
//! Every probe implements [`Probe`]: given a descriptor and a deadline, it
//! returns a semantic verdict. Probes never retry themselves — that's
//! [`crate::retry_attempts`]'s job — and never mutate the descriptor.

mod cloud;
mod container;
mod custom;
mod dns;
mod github;
mod heartbeat;
mod keyword;
mod ping;
mod ssl;
mod tcp;
mod uptime_api;
mod web;

pub use cloud::{CloudHealthProvider, NoOpCloudHealthProvider, ProviderHealth};
pub use container::{ContainerRuntimeProvider, NoOpContainerRuntimeProvider, RunningCount};
pub use heartbeat::HeartbeatSource;

use crate::error::ProbeError;
use crate::result::{CheckResult, CheckStatus};
use nestwatch_core::RollingWindow;
use nestwatch_registry::{ServiceDescriptor, ServiceType};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

/// A single probe attempt. Implementations respect `deadline` and classify
/// the outcome into up/down/degraded/unknown plus a message.
pub trait Probe: Send + Sync {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        deadline: Duration,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = std::result::Result<ProbeOutcome, ProbeError>> + Send + 'a>>;
}

pub struct ProbeOutcome {
    pub status: CheckStatus,
    pub message: String,
    pub response_time: Option<Duration>,
    pub metadata: serde_json::Value,
}

impl ProbeOutcome {
    pub fn up(message: impl Into<String>, response_time: Duration) -> Self {
        Self {
            status: CheckStatus::Up,
            message: message.into(),
            response_time: Some(response_time),
            metadata: serde_json::Value::Null,
        }
    }

    pub fn degraded(message: impl Into<String>, response_time: Duration) -> Self {
        Self {
            status: CheckStatus::Degraded,
            message: message.into(),
            response_time: Some(response_time),
            metadata: serde_json::Value::Null,
        }
    }

    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Down,
            message: message.into(),
            response_time: None,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Dispatches to the registered probe for `descriptor.service_type` and
/// converts its outcome into a fully-populated [`CheckResult`]. `attempt` is
/// filled in by the caller (the retry-with-attempts wrapper).
pub struct ProbeRegistry {
    cloud: Arc<dyn CloudHealthProvider>,
    heartbeat: Arc<dyn HeartbeatSource>,
    container: Arc<dyn ContainerRuntimeProvider>,
    /// Per-service rolling window of healthy response times, for the
    /// `response time > 2x rolling avg` degraded signal (`web`/`ping`).
    response_times: Mutex<HashMap<String, RollingWindow<f64>>>,
}

const RESPONSE_TIME_WINDOW: Duration = Duration::from_secs(30 * 60);

impl ProbeRegistry {
    pub fn new(cloud: Arc<dyn CloudHealthProvider>, heartbeat: Arc<dyn HeartbeatSource>, container: Arc<dyn ContainerRuntimeProvider>) -> Self {
        Self {
            cloud,
            heartbeat,
            container,
            response_times: Mutex::new(HashMap::new()),
        }
    }

    pub fn noop() -> Self {
        Self::new(
            Arc::new(cloud::NoOpCloudHealthProvider),
            Arc::new(heartbeat::NoOpHeartbeatSource),
            Arc::new(container::NoOpContainerRuntimeProvider),
        )
    }

    fn probe_for(&self, service_type: &ServiceType) -> Box<dyn Probe + '_> {
        match service_type {
            ServiceType::Web => Box::new(web::WebProbe),
            ServiceType::Tcp | ServiceType::Port => Box::new(tcp::TcpProbe),
            ServiceType::Ping => Box::new(ping::PingProbe),
            ServiceType::Dns => Box::new(dns::DnsProbe),
            ServiceType::Ssl => Box::new(ssl::SslProbe),
            ServiceType::Keyword => Box::new(keyword::KeywordProbe),
            ServiceType::Heartbeat => Box::new(heartbeat::HeartbeatProbe::new(Arc::clone(&self.heartbeat))),
            ServiceType::Github => Box::new(github::GithubProbe),
            ServiceType::UptimeApi => Box::new(uptime_api::UptimeApiProbe),
            ServiceType::Custom => Box::new(custom::CustomProbe),
            ServiceType::AwsHealth | ServiceType::AzureHealth | ServiceType::GcpHealth => {
                Box::new(cloud::CloudHealthProbe::new(Arc::clone(&self.cloud)))
            }
            ServiceType::Kubernetes | ServiceType::Docker => Box::new(container::ContainerProbe::new(Arc::clone(&self.container))),
        }
    }

    /// Downgrades an `Up` web/ping result to `Degraded` when its response
    /// time exceeds twice the rolling average of recent healthy checks.
    fn apply_rolling_degradation(&self, service_type: &ServiceType, service_id: &str, outcome: &mut ProbeOutcome) {
        if !matches!(service_type, ServiceType::Web | ServiceType::Ping) {
            return;
        }
        let Some(response_time) = outcome.response_time else { return };
        if outcome.status != CheckStatus::Up {
            return;
        }

        let now = Instant::now();
        let mut windows = self.response_times.lock().unwrap();
        let window = windows.entry(service_id.to_string()).or_insert_with(|| RollingWindow::new(RESPONSE_TIME_WINDOW));

        if let Some(avg) = window.average(now) {
            if response_time.as_secs_f64() > avg * 2.0 {
                outcome.status = CheckStatus::Degraded;
                outcome.message = format!("{} (response time {response_time:?} > 2x rolling avg)", outcome.message);
            }
        }
        window.push(response_time.as_secs_f64(), now);
    }

    pub async fn run(&self, descriptor: &ServiceDescriptor, attempt: u32) -> std::result::Result<CheckResult, ProbeError> {
        let started = Instant::now();
        let probe = self.probe_for(&descriptor.service_type);
        let mut outcome = probe.probe(descriptor, descriptor.timeout).await?;
        let check_duration = started.elapsed();
        self.apply_rolling_degradation(&descriptor.service_type, &descriptor.service_id, &mut outcome);

        Ok(CheckResult {
            service_id: descriptor.service_id.clone(),
            nest_id: descriptor.nest_id.clone(),
            status: outcome.status,
            message: outcome.message,
            response_time: outcome.response_time,
            timestamp: SystemTime::now(),
            check_duration,
            attempt,
            metadata: outcome.metadata,
        })
    }
}

/// Runs an async operation against a hard deadline, mapping elapsed time to
/// [`ProbeError::DeadlineExceeded`].
pub(crate) async fn with_deadline<F, T>(deadline: Duration, fut: F) -> std::result::Result<T, ProbeError>
where
    F: std::future::Future<Output = std::result::Result<T, ProbeError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::DeadlineExceeded),
    }
}
