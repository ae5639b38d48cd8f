//! `dns`: resolves `target` and, if `expectedValue` is configured, requires
//! the answer set to contain it.

use super::{with_deadline, Probe, ProbeOutcome};
use crate::error::ProbeError;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use nestwatch_registry::ServiceDescriptor;
use std::time::{Duration, Instant};

pub struct DnsProbe;

impl Probe for DnsProbe {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        deadline: Duration,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<ProbeOutcome, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let expected = descriptor.type_config.get("expected_value").and_then(|v| v.as_str());
            let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

            let started = Instant::now();
            let response = with_deadline(deadline, async {
                resolver.lookup_ip(&descriptor.target).await.map_err(classify_resolve_error)
            })
            .await?;
            let elapsed = started.elapsed();

            let answers: Vec<String> = response.iter().map(|ip| ip.to_string()).collect();
            if answers.is_empty() {
                return Ok(ProbeOutcome::down("NXDOMAIN"));
            }

            if let Some(expected) = expected {
                if !answers.iter().any(|a| a == expected) {
                    return Ok(ProbeOutcome::down(format!("expected {expected} not in {answers:?}")));
                }
            }

            Ok(ProbeOutcome::up(format!("resolved {} records", answers.len()), elapsed)
                .with_metadata(serde_json::json!({ "answers": answers })))
        })
    }
}

fn classify_resolve_error(err: hickory_resolver::error::ResolveError) -> ProbeError {
    use hickory_resolver::error::ResolveErrorKind;
    match err.kind() {
        ResolveErrorKind::Timeout => ProbeError::Timeout,
        _ => ProbeError::Resolution(err.to_string()),
    }
}
