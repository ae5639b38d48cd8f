//! `keyword`: fetches `target` and checks whether the body contains (or must
//! not contain) a configured substring, case-folded.

use super::web::classify_reqwest_error;
use super::{with_deadline, Probe, ProbeOutcome};
use crate::error::ProbeError;
use nestwatch_registry::ServiceDescriptor;
use std::time::{Duration, Instant};

pub struct KeywordProbe;

impl Probe for KeywordProbe {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        deadline: Duration,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<ProbeOutcome, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let must_contain = descriptor
                .type_config
                .get("must_contain")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_lowercase();

            let client = reqwest::Client::builder()
                .timeout(deadline)
                .build()
                .map_err(|e| ProbeError::Transport(e.to_string()))?;

            let started = Instant::now();
            let body = with_deadline(deadline, async {
                let response = client.get(&descriptor.target).send().await.map_err(classify_reqwest_error)?;
                response.text().await.map_err(classify_reqwest_error)
            })
            .await?;
            let elapsed = started.elapsed();

            if !must_contain.is_empty() && !body.to_lowercase().contains(&must_contain) {
                return Ok(ProbeOutcome::down(format!("body did not contain {must_contain:?}")));
            }

            Ok(ProbeOutcome::up("keyword matched", elapsed))
        })
    }
}
