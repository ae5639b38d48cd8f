//! The registry: validates, persists, and publishes lifecycle events for
//! `ServiceDefinition`s. The monitoring engine subscribes to these events to
//! keep its scheduler in sync.

use crate::definition::ServiceDefinition;
use crate::descriptor::ServiceDescriptor;
use crate::error::{RegistryError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum RegistryEvent {
    ServiceAdded(ServiceDescriptor),
    ServiceUpdated(ServiceDescriptor),
    ServiceRemoved { service_id: String, nest_id: String },
}

pub type RegistryListener = Arc<dyn Fn(&RegistryEvent) + Send + Sync>;

pub struct Registry {
    definitions: Mutex<HashMap<String, ServiceDefinition>>,
    per_tenant_cap: usize,
    listeners: Mutex<Vec<RegistryListener>>,
}

impl Registry {
    pub fn new(per_tenant_cap: usize) -> Self {
        Self {
            definitions: Mutex::new(HashMap::new()),
            per_tenant_cap,
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, listener: RegistryListener) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn emit(&self, event: RegistryEvent) {
        for listener in self.listeners.lock().unwrap().iter() {
            listener(&event);
        }
    }

    /// Validates `definition` (type-specific target rules, interval bounds,
    /// tag pattern, per-tenant cap) and inserts or replaces it, publishing
    /// `ServiceAdded`/`ServiceUpdated` accordingly.
    pub fn register(&self, definition: ServiceDefinition) -> Result<()> {
        definition.validate()?;

        let mut definitions = self.definitions.lock().unwrap();
        let is_update = definitions.contains_key(&definition.id);

        if !is_update {
            let tenant_count = definitions
                .values()
                .filter(|d| d.nest_id == definition.nest_id)
                .count();
            if tenant_count >= self.per_tenant_cap {
                return Err(RegistryError::TenantCapExceeded {
                    nest_id: definition.nest_id,
                    cap: self.per_tenant_cap,
                });
            }
        }

        let descriptor = ServiceDescriptor::from(&definition);
        definitions.insert(definition.id.clone(), definition);
        drop(definitions);

        self.emit(if is_update {
            RegistryEvent::ServiceUpdated(descriptor)
        } else {
            RegistryEvent::ServiceAdded(descriptor)
        });
        Ok(())
    }

    pub fn remove(&self, nest_id: &str, service_id: &str) -> Result<()> {
        let mut definitions = self.definitions.lock().unwrap();
        match definitions.get(service_id) {
            Some(def) if def.nest_id == nest_id => {
                definitions.remove(service_id);
                drop(definitions);
                self.emit(RegistryEvent::ServiceRemoved {
                    service_id: service_id.to_string(),
                    nest_id: nest_id.to_string(),
                });
                Ok(())
            }
            _ => Err(RegistryError::NotFound(service_id.to_string())),
        }
    }

    /// The live set of enabled services for a nest, as runtime descriptors.
    pub fn list_for_nest(&self, nest_id: &str) -> Vec<ServiceDescriptor> {
        self.definitions
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.nest_id == nest_id && d.enabled)
            .map(ServiceDescriptor::from)
            .collect()
    }

    pub fn get(&self, service_id: &str) -> Option<ServiceDefinition> {
        self.definitions.lock().unwrap().get(service_id).cloned()
    }
}
