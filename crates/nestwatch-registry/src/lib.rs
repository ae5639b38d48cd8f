//! Validated, typed specifications of what to monitor.
//!
//! A [`ServiceDefinition`] is the persisted, tenant-owned record; validation
//! runs the per-type target rules (see [`types::validate_target`]) plus
//! cross-cutting checks (interval bounds, tag pattern, per-tenant cap) before
//! [`Registry::register`] accepts it. The monitoring engine never sees a
//! `ServiceDefinition` directly — it consumes the flattened
//! [`ServiceDescriptor`] and subscribes to [`RegistryEvent`]s to learn about
//! additions, updates, and removals.

mod definition;
mod descriptor;
mod error;
mod registry;
pub mod templates;
mod types;

pub use definition::{
    AlertingPolicy, BusinessImpact, Criticality, QuietHours, RuntimeShadow, ServiceDefinition,
    ServiceStatus,
};
pub use descriptor::ServiceDescriptor;
pub use error::{RegistryError, Result};
pub use registry::{Registry, RegistryEvent, RegistryListener};
pub use types::{validate_target, ServiceType};
