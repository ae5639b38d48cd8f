//! Trigger-condition evaluation against an endpoint's rolling metrics.

use crate::metrics::EndpointMetrics;
use crate::types::{TriggerCondition, TriggerConditionSnapshot, TriggerMetric};
use std::time::Instant;

/// Evaluates every condition against `metrics`, snapshotting the observed
/// value alongside the verdict so events can replay why a rule fired.
pub fn evaluate(conditions: &[TriggerCondition], metrics: &EndpointMetrics, now: Instant) -> Vec<TriggerConditionSnapshot> {
    conditions
        .iter()
        .map(|condition| {
            let observed = match condition.metric {
                TriggerMetric::ResponseTime => metrics.response_time_avg(now).map(|d| d.as_secs_f64()).unwrap_or(0.0),
                TriggerMetric::ErrorRate => metrics.error_rate(now),
                TriggerMetric::Availability => metrics.availability(now),
            };
            TriggerConditionSnapshot {
                metric: condition.metric,
                operator: condition.operator,
                threshold: condition.threshold,
                observed,
                holds: condition.operator.holds(observed, condition.threshold),
            }
        })
        .collect()
}

pub fn all_hold(snapshots: &[TriggerConditionSnapshot]) -> bool {
    !snapshots.is_empty() && snapshots.iter().all(|s| s.holds)
}
