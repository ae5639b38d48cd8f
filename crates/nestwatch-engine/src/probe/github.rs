//! `github`: GitHub API reachability, optionally asserting the last workflow
//! run concluded successfully and open issues stay under a threshold.

use super::web::classify_reqwest_error;
use super::{with_deadline, Probe, ProbeOutcome};
use crate::error::ProbeError;
use nestwatch_registry::ServiceDescriptor;
use std::time::{Duration, Instant};

pub struct GithubProbe;

impl Probe for GithubProbe {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        deadline: Duration,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<ProbeOutcome, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let issue_threshold = descriptor.type_config.get("max_open_issues").and_then(|v| v.as_u64());
            let require_workflow_success = descriptor
                .type_config
                .get("require_workflow_success")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);

            let client = reqwest::Client::builder()
                .user_agent("nestwatch")
                .timeout(deadline)
                .build()
                .map_err(|e| ProbeError::Transport(e.to_string()))?;

            let repo_url = format!("https://api.github.com/repos/{}", descriptor.target);
            let started = Instant::now();
            let repo: serde_json::Value = with_deadline(deadline, async {
                client
                    .get(&repo_url)
                    .send()
                    .await
                    .map_err(classify_reqwest_error)?
                    .json()
                    .await
                    .map_err(classify_reqwest_error)
            })
            .await?;
            let elapsed = started.elapsed();

            let open_issues = repo.get("open_issues_count").and_then(|v| v.as_u64()).unwrap_or(0);

            if require_workflow_success {
                let runs_url = format!("https://api.github.com/repos/{}/actions/runs?per_page=1", descriptor.target);
                let runs: serde_json::Value = with_deadline(deadline, async {
                    client
                        .get(&runs_url)
                        .send()
                        .await
                        .map_err(classify_reqwest_error)?
                        .json()
                        .await
                        .map_err(classify_reqwest_error)
                })
                .await?;

                let conclusion = runs
                    .get("workflow_runs")
                    .and_then(|v| v.as_array())
                    .and_then(|arr| arr.first())
                    .and_then(|run| run.get("conclusion"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown");

                if conclusion != "success" {
                    return Ok(ProbeOutcome::down(format!("last workflow run concluded {conclusion}")));
                }
            }

            if let Some(threshold) = issue_threshold {
                if open_issues > threshold {
                    return Ok(ProbeOutcome::down(format!("open issues {open_issues} exceeds threshold {threshold}")));
                }
                if open_issues as f64 > threshold as f64 * 0.8 {
                    return Ok(ProbeOutcome::degraded(format!("open issues {open_issues} near threshold {threshold}"), elapsed));
                }
            }

            Ok(ProbeOutcome::up(format!("{open_issues} open issues"), elapsed))
        })
    }
}
