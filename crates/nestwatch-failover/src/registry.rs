//! Owns the endpoint and rule maps. Arena-and-index style: endpoints and
//! rules are looked up by id; nothing holds a direct reference to another.

use crate::error::{FailoverError, Result};
use crate::metrics::EndpointMetrics;
use crate::types::{EndpointStatus, FailoverRule, ServiceEndpoint};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Mutex;

pub struct EndpointRegistry {
    endpoints: Mutex<HashMap<String, ServiceEndpoint>>,
    metrics: Mutex<HashMap<String, EndpointMetrics>>,
    rules: Mutex<HashMap<String, FailoverRule>>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self {
            endpoints: Mutex::new(HashMap::new()),
            metrics: Mutex::new(HashMap::new()),
            rules: Mutex::new(HashMap::new()),
        }
    }

    pub fn register_endpoint(&self, endpoint: ServiceEndpoint) {
        let id = endpoint.id.clone();
        self.endpoints.lock().unwrap().insert(id.clone(), endpoint);
        self.metrics.lock().unwrap().entry(id).or_insert_with(EndpointMetrics::new);
    }

    pub fn remove_endpoint(&self, id: &str) {
        self.endpoints.lock().unwrap().remove(id);
        self.metrics.lock().unwrap().remove(id);
    }

    pub fn get_endpoint(&self, id: &str) -> Option<ServiceEndpoint> {
        self.endpoints.lock().unwrap().get(id).cloned()
    }

    pub fn list_endpoints(&self) -> Vec<ServiceEndpoint> {
        self.endpoints.lock().unwrap().values().cloned().collect()
    }

    pub fn set_status(&self, id: &str, status: EndpointStatus) {
        if let Some(endpoint) = self.endpoints.lock().unwrap().get_mut(id) {
            endpoint.status = status;
        }
    }

    pub fn set_last_health_check(&self, id: &str, at: std::time::SystemTime) {
        if let Some(endpoint) = self.endpoints.lock().unwrap().get_mut(id) {
            endpoint.last_health_check = Some(at);
        }
    }

    pub fn with_metrics<T>(&self, id: &str, f: impl FnOnce(&mut EndpointMetrics) -> T) -> Option<T> {
        let mut metrics = self.metrics.lock().unwrap();
        metrics.get_mut(id).map(f)
    }

    /// Validates `rule.service_pattern` compiles, then inserts or replaces it.
    pub fn register_rule(&self, rule: FailoverRule) -> Result<()> {
        Regex::new(&rule.service_pattern)?;
        self.rules.lock().unwrap().insert(rule.id.clone(), rule);
        Ok(())
    }

    pub fn get_rule(&self, id: &str) -> Option<FailoverRule> {
        self.rules.lock().unwrap().get(id).cloned()
    }

    pub fn list_rules(&self) -> Vec<FailoverRule> {
        self.rules.lock().unwrap().values().cloned().collect()
    }

    /// Endpoints whose `name` matches `rule.service_pattern`.
    pub fn endpoints_matching(&self, rule: &FailoverRule) -> Result<Vec<ServiceEndpoint>> {
        let pattern = Regex::new(&rule.service_pattern)?;
        Ok(self
            .list_endpoints()
            .into_iter()
            .filter(|e| pattern.is_match(&e.name))
            .collect())
    }

    pub fn require_endpoint(&self, id: &str) -> Result<ServiceEndpoint> {
        self.get_endpoint(id).ok_or_else(|| FailoverError::UnknownEndpoint(id.to_string()))
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FailoverStrategyKind, RecoveryStrategyKind, SelectionMode};
    use std::time::Duration;

    fn endpoint(id: &str) -> ServiceEndpoint {
        ServiceEndpoint {
            id: id.to_string(),
            name: format!("api-{id}"),
            url: "https://example.com".to_string(),
            health_check_path: "/health".to_string(),
            region: "eu".to_string(),
            priority: 1,
            capacity: 100,
            current_load: 0,
            status: EndpointStatus::Healthy,
            last_health_check: None,
        }
    }

    fn rule(pattern: &str) -> FailoverRule {
        FailoverRule {
            id: "rule-1".to_string(),
            name: "test-rule".to_string(),
            service_pattern: pattern.to_string(),
            trigger_conditions: Vec::new(),
            failover_strategy: FailoverStrategyKind::Immediate,
            recovery_strategy: RecoveryStrategyKind::Manual,
            cooldown_period: Duration::from_secs(60),
            selection_mode: SelectionMode::HighestPriority,
            priority: 1,
            enabled: true,
        }
    }

    #[test]
    fn endpoints_matching_filters_by_name_pattern() {
        let registry = EndpointRegistry::new();
        registry.register_endpoint(endpoint("a"));
        registry.register_endpoint(endpoint("b"));

        let matching = registry.endpoints_matching(&rule("^api-a$")).unwrap();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id, "a");
    }

    #[test]
    fn register_rule_rejects_invalid_regex() {
        let registry = EndpointRegistry::new();
        assert!(registry.register_rule(rule("(unterminated")).is_err());
    }
}
