//! Periodic health sampling: one GET per non-maintenance endpoint, fanned out
//! concurrently, feeding into each endpoint's rolling metrics and status.

use crate::registry::EndpointRegistry;
use crate::types::EndpointStatus;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

pub struct HealthSampler {
    registry: Arc<EndpointRegistry>,
    client: reqwest::Client,
    timeout: Duration,
}

impl HealthSampler {
    pub fn new(registry: Arc<EndpointRegistry>, timeout: Duration) -> Self {
        Self {
            registry,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("reqwest client config is static and valid"),
            timeout,
        }
    }

    /// Probes every non-`Maintenance` endpoint once, in parallel.
    pub async fn sample_once(&self) {
        let targets: Vec<_> = self
            .registry
            .list_endpoints()
            .into_iter()
            .filter(|e| e.status != EndpointStatus::Maintenance)
            .collect();

        join_all(targets.iter().map(|e| self.sample_one(&e.id, &e.url, &e.health_check_path))).await;
    }

    async fn sample_one(&self, endpoint_id: &str, url: &str, health_check_path: &str) {
        let probe_url = format!("{}{}", url.trim_end_matches('/'), health_check_path);
        let started = Instant::now();
        let result = tokio::time::timeout(self.timeout, self.client.get(&probe_url).send()).await;

        let (success, response_time) = match result {
            Ok(Ok(response)) if response.status().is_success() => (true, Some(started.elapsed())),
            _ => (false, None),
        };

        let now = Instant::now();
        self.registry.with_metrics(endpoint_id, |metrics| metrics.record(success, response_time, now));
        self.registry.set_last_health_check(endpoint_id, SystemTime::now());
        self.registry.set_status(endpoint_id, self.derive_status(endpoint_id, success, response_time, now));
    }

    /// `UNHEALTHY` on failure; `DEGRADED` if the response took more than twice
    /// the endpoint's rolling average and over a second; `HEALTHY` otherwise.
    fn derive_status(&self, endpoint_id: &str, success: bool, response_time: Option<Duration>, now: Instant) -> EndpointStatus {
        if !success {
            return EndpointStatus::Unhealthy;
        }
        let Some(response_time) = response_time else {
            return EndpointStatus::Healthy;
        };

        let avg = self
            .registry
            .with_metrics(endpoint_id, |metrics| metrics.response_time_avg(now))
            .flatten();

        if let Some(avg) = avg {
            if response_time > avg.mul_f64(2.0) && response_time > Duration::from_secs(1) {
                return EndpointStatus::Degraded;
            }
        }
        EndpointStatus::Healthy
    }
}
