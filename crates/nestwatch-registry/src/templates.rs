//! Constructor functions returning pre-filled `ServiceDefinition`s for
//! common cases, the same "preset" idea `nestwatch-retry`'s presets apply
//! to backoff policies, applied here to service definitions.

use crate::definition::{AlertingPolicy, BusinessImpact, Criticality, ServiceDefinition};
use crate::types::ServiceType;
use std::time::Duration;

fn base(id: impl Into<String>, nest_id: impl Into<String>, name: impl Into<String>) -> ServiceDefinition {
    ServiceDefinition {
        id: id.into(),
        nest_id: nest_id.into(),
        name: name.into(),
        description: None,
        tags: Vec::new(),
        group: None,
        category: None,
        service_type: ServiceType::Web,
        target: String::new(),
        type_config: serde_json::Value::Null,
        interval: Duration::from_secs(60),
        timeout: Duration::from_secs(10),
        retries: 2,
        enabled: true,
        alerting: AlertingPolicy::default(),
        criticality: Criticality::Medium,
        business_impact: BusinessImpact::Internal,
        runtime: Default::default(),
    }
}

/// A plain `GET` health check expecting any 2xx response.
pub fn basic_web(id: impl Into<String>, nest_id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> ServiceDefinition {
    let mut def = base(id, nest_id, name);
    def.service_type = ServiceType::Web;
    def.target = url.into();
    def.type_config = serde_json::json!({ "acceptable_status": [200, 201, 202, 203, 204] });
    def
}

/// An API endpoint check with a JSON-path assertion on the response body.
pub fn api_json(
    id: impl Into<String>,
    nest_id: impl Into<String>,
    name: impl Into<String>,
    url: impl Into<String>,
    json_path: impl Into<String>,
    expected: serde_json::Value,
) -> ServiceDefinition {
    let mut def = base(id, nest_id, name);
    def.service_type = ServiceType::UptimeApi;
    def.target = url.into();
    def.type_config = serde_json::json!({ "json_path": json_path.into(), "expected": expected });
    def.criticality = Criticality::High;
    def
}

/// A TCP reachability check for a database listener.
pub fn db_tcp(id: impl Into<String>, nest_id: impl Into<String>, name: impl Into<String>, host_port: impl Into<String>) -> ServiceDefinition {
    let mut def = base(id, nest_id, name);
    def.service_type = ServiceType::Tcp;
    def.target = host_port.into();
    def.interval = Duration::from_secs(30);
    def.criticality = Criticality::Critical;
    def.business_impact = BusinessImpact::RevenueImpacting;
    def
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_web_template_validates() {
        let def = basic_web("svc-1", "acme", "homepage", "https://example.com");
        assert!(def.validate().is_ok());
    }

    #[test]
    fn db_tcp_template_validates() {
        let def = db_tcp("svc-2", "acme", "primary-db", "db.internal:5432");
        assert!(def.validate().is_ok());
    }
}
