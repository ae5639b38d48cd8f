//! `ServiceDescriptor`: the flattened, probe-facing view of a
//! `ServiceDefinition` consumed by the monitoring engine.

use crate::definition::{RuntimeShadowSlot, ServiceDefinition};
use crate::types::ServiceType;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    pub service_id: String,
    pub nest_id: String,
    pub name: String,
    pub service_type: ServiceType,
    pub target: String,
    pub type_config: serde_json::Value,
    pub interval: Duration,
    pub timeout: Duration,
    pub retries: u32,
    /// Shared handle onto the definition's mutable runtime state, so the
    /// engine can record check outcomes without a registry round-trip.
    pub runtime: RuntimeShadowSlot,
}

impl From<&ServiceDefinition> for ServiceDescriptor {
    fn from(def: &ServiceDefinition) -> Self {
        Self {
            service_id: def.id.clone(),
            nest_id: def.nest_id.clone(),
            name: def.name.clone(),
            service_type: def.service_type.clone(),
            target: def.target.clone(),
            type_config: def.type_config.clone(),
            interval: def.interval,
            timeout: def.timeout,
            retries: def.retries,
            runtime: def.runtime.clone(),
        }
    }
}
