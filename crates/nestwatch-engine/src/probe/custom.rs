//! `custom`: a bare assertion against an arbitrary URL — status code, body
//! regex, or JSON-path — with no external-provider semantics assumed.

use super::web::classify_reqwest_error;
use super::{with_deadline, Probe, ProbeOutcome};
use crate::error::ProbeError;
use nestwatch_registry::ServiceDescriptor;
use std::time::{Duration, Instant};

pub struct CustomProbe;

impl Probe for CustomProbe {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        deadline: Duration,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<ProbeOutcome, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let client = reqwest::Client::builder()
                .timeout(deadline)
                .build()
                .map_err(|e| ProbeError::Transport(e.to_string()))?;

            let started = Instant::now();
            let response = with_deadline(deadline, async {
                client.get(&descriptor.target).send().await.map_err(classify_reqwest_error)
            })
            .await?;

            if let Some(expected_status) = descriptor.type_config.get("status_code").and_then(|v| v.as_u64()) {
                if response.status().as_u16() as u64 != expected_status {
                    return Ok(ProbeOutcome::down(format!("status {} != expected {expected_status}", response.status())));
                }
            }

            if let Some(pattern) = descriptor.type_config.get("body_regex").and_then(|v| v.as_str()) {
                let body = with_deadline(deadline, async { response.text().await.map_err(classify_reqwest_error) }).await?;
                let elapsed = started.elapsed();
                let re = regex::Regex::new(pattern).map_err(|e| ProbeError::AssertionFailed(e.to_string()))?;
                if !re.is_match(&body) {
                    return Ok(ProbeOutcome::down(format!("body did not match /{pattern}/")));
                }
                return Ok(ProbeOutcome::up("assertion held", elapsed));
            }

            Ok(ProbeOutcome::up("reachable", started.elapsed()))
        })
    }
}
