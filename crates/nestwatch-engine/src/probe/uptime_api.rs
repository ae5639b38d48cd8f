//! `uptime-api`: reachability plus a configured JSON-path assertion against
//! an upstream uptime-provider response envelope.

use super::web::classify_reqwest_error;
use super::{with_deadline, Probe, ProbeOutcome};
use crate::error::ProbeError;
use nestwatch_registry::ServiceDescriptor;
use std::time::{Duration, Instant};

pub struct UptimeApiProbe;

impl Probe for UptimeApiProbe {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        deadline: Duration,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<ProbeOutcome, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let json_path = descriptor.type_config.get("json_path").and_then(|v| v.as_str());
            let expected = descriptor.type_config.get("expected");

            let client = reqwest::Client::builder()
                .timeout(deadline)
                .build()
                .map_err(|e| ProbeError::Transport(e.to_string()))?;

            let started = Instant::now();
            let body: serde_json::Value = with_deadline(deadline, async {
                client
                    .get(&descriptor.target)
                    .send()
                    .await
                    .map_err(classify_reqwest_error)?
                    .json()
                    .await
                    .map_err(classify_reqwest_error)
            })
            .await?;
            let elapsed = started.elapsed();

            if let (Some(path), Some(expected)) = (json_path, expected) {
                let actual = walk_json_path(&body, path);
                if actual.as_ref() != Some(expected) {
                    return Ok(ProbeOutcome::down(format!("{path} was {actual:?}, expected {expected:?}")));
                }
            }

            Ok(ProbeOutcome::up("assertion held", elapsed))
        })
    }
}

/// Resolves a dotted JSON path like `status.indicator` against `value`.
fn walk_json_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    path.split('.').try_fold(value, |acc, segment| acc.get(segment))
}
