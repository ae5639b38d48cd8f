//! Per-service scheduling and probe dispatch for the monitoring engine.
//!
//! - [`scheduler`] fires an independent timer per service, so one slow
//!   service can't delay another's checks.
//! - [`dispatcher`] bounds total in-flight probes to `concurrentChecks` and
//!   coalesces concurrent dispatches for the same service.
//! - [`probe`] holds one [`probe::Probe`] implementation per
//!   [`nestwatch_registry::ServiceType`].
//! - [`retry_attempts`] wraps a single probe call in up to `retries + 1`
//!   attempts, retrying only transport-class failures.
//! - [`connectivity_guard`] tells apart a single dead target from a dead
//!   environment before letting a wave of `down` results turn into alerts.
//! - [`engine`] is the facade tying the above together with the registry and
//!   the tenant storage adapter.

mod config;
mod connectivity_guard;
mod dispatcher;
mod engine;
mod error;
mod events;
pub mod probe;
mod result;
mod retry_attempts;
mod scheduler;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use connectivity_guard::ConnectivityGuard;
pub use dispatcher::Dispatcher;
pub use engine::MonitoringEngine;
pub use error::{EngineError, ProbeError, Result};
pub use events::EngineEvent;
pub use probe::{CloudHealthProvider, ContainerRuntimeProvider, HeartbeatSource, Probe, ProbeOutcome, ProbeRegistry};
pub use result::{CheckResult, CheckStatus};
pub use retry_attempts::run_with_attempts;
