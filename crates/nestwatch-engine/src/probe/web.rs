//! `web`: HTTP(S) GET against `target`, verdict from the response status.

use super::{with_deadline, Probe, ProbeOutcome};
use crate::error::ProbeError;
use nestwatch_registry::ServiceDescriptor;
use std::time::{Duration, Instant};

fn acceptable_statuses(type_config: &serde_json::Value) -> Vec<u16> {
    type_config
        .get("acceptable_status")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_u64()).map(|v| v as u16).collect())
        .unwrap_or_else(|| vec![200])
}

pub struct WebProbe;

impl Probe for WebProbe {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        deadline: Duration,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<ProbeOutcome, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let acceptable = acceptable_statuses(&descriptor.type_config);
            let client = reqwest::Client::builder()
                .timeout(deadline)
                .build()
                .map_err(|e| ProbeError::Transport(e.to_string()))?;

            let started = Instant::now();
            let response = with_deadline(deadline, async {
                client
                    .get(&descriptor.target)
                    .send()
                    .await
                    .map_err(classify_reqwest_error)
            })
            .await?;
            let elapsed = started.elapsed();

            let status = response.status().as_u16();
            if !acceptable.contains(&status) {
                return Ok(ProbeOutcome::down(format!("unacceptable status {status}")));
            }

            Ok(ProbeOutcome::up(format!("status {status}"), elapsed))
        })
    }
}

pub(crate) fn classify_reqwest_error(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout
    } else if err.is_connect() {
        ProbeError::ConnectionRefused
    } else if err.to_string().to_lowercase().contains("tls") || err.to_string().to_lowercase().contains("certificate") {
        ProbeError::TlsHandshake(err.to_string())
    } else {
        ProbeError::Transport(err.to_string())
    }
}
