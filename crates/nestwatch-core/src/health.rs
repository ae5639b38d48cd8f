//! Self-health reporting, shared by every component.
//!
//! Every component exposes `health()`; the process entrypoint ANDs them
//! together. This mirrors a target-health checker shape (see
//! `nestwatch-healthcheck`), applied here to a component's own liveness
//! rather than to an external resource.

use std::collections::BTreeMap;

/// One component's self-reported health.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentHealth {
    pub healthy: bool,
    pub details: BTreeMap<String, String>,
}

impl ComponentHealth {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            details: BTreeMap::new(),
        }
    }

    pub fn unhealthy(reason: impl Into<String>) -> Self {
        let mut details = BTreeMap::new();
        details.insert("reason".to_string(), reason.into());
        Self {
            healthy: false,
            details,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Implemented by every long-lived component (pool, DLQ consumer,
/// storage adapter, engine, failover controller) so the process
/// aggregator can compute overall health without knowing component
/// internals.
pub trait Health: Send + Sync {
    fn health(&self) -> ComponentHealth;
}

/// ANDs a set of component healths into one process-level health.
pub fn aggregate<'a>(components: impl IntoIterator<Item = (&'a str, ComponentHealth)>) -> ComponentHealth {
    let mut healthy = true;
    let mut details = BTreeMap::new();
    for (name, h) in components {
        if !h.healthy {
            healthy = false;
        }
        details.insert(
            name.to_string(),
            if h.healthy { "healthy".to_string() } else { "unhealthy".to_string() },
        );
    }
    ComponentHealth { healthy, details }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_is_healthy_only_if_all_components_are() {
        let all_healthy = aggregate([("a", ComponentHealth::healthy()), ("b", ComponentHealth::healthy())]);
        assert!(all_healthy.healthy);

        let one_down = aggregate([
            ("a", ComponentHealth::healthy()),
            ("b", ComponentHealth::unhealthy("db down")),
        ]);
        assert!(!one_down.healthy);
        assert_eq!(one_down.details.get("b").unwrap(), "unhealthy");
    }
}
