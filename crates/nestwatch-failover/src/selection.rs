//! Target selection: candidates are the other endpoints matching a rule's
//! pattern, `Healthy`, preferring the same region as the source.
//!
//! This is a sibling of `nestwatch_healthcheck::SelectionStrategy` rather
//! than a reuse of it: that type selects over a generic `[HealthCheckedContext<T>]`
//! with no notion of region or priority, and teaching it those domain fields
//! would leak failover concerns into a crate several other components share.

use crate::types::{SelectionMode, ServiceEndpoint};
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct TargetSelector {
    round_robin_counters: std::sync::Mutex<std::collections::HashMap<String, AtomicUsize>>,
}

impl TargetSelector {
    pub fn new() -> Self {
        Self {
            round_robin_counters: std::sync::Mutex::new(std::collections::HashMap::new()),
        }
    }

    /// Picks a target from `candidates` (already filtered to `Healthy`,
    /// excluding the source) for `rule_id` under `mode`. Prefers endpoints in
    /// `source_region`; falls back to the full candidate set if none match.
    pub fn select<'a>(
        &self,
        rule_id: &str,
        mode: SelectionMode,
        source_region: &str,
        candidates: &'a [ServiceEndpoint],
    ) -> Option<&'a ServiceEndpoint> {
        let in_region: Vec<&ServiceEndpoint> = candidates.iter().filter(|e| e.region == source_region).collect();
        let pool: Vec<&ServiceEndpoint> = if in_region.is_empty() { candidates.iter().collect() } else { in_region };

        if pool.is_empty() {
            return None;
        }

        match mode {
            SelectionMode::HighestPriority => pool.into_iter().min_by_key(|e| e.priority),
            SelectionMode::LowestLoad => pool.into_iter().min_by(|a, b| a.load_fraction().total_cmp(&b.load_fraction())),
            SelectionMode::Random => {
                let idx = rand::rng().random_range(0..pool.len());
                Some(pool[idx])
            }
            SelectionMode::ClosestRegion => pool.into_iter().min_by_key(|e| e.priority),
            SelectionMode::RoundRobin => {
                let mut counters = self.round_robin_counters.lock().unwrap();
                let counter = counters.entry(rule_id.to_string()).or_insert_with(|| AtomicUsize::new(0));
                let idx = counter.fetch_add(1, Ordering::Relaxed) % pool.len();
                Some(pool[idx])
            }
            SelectionMode::Custom => pool.into_iter().min_by_key(|e| e.priority),
        }
    }
}

impl Default for TargetSelector {
    fn default() -> Self {
        Self::new()
    }
}
