//! Process entrypoint: wires the registry, storage adapter, monitoring
//! engine, and failover controller together for a single tenant and runs
//! them until interrupted.
//!
//! Run with: cargo run --bin nestwatch

use nestwatch_core::events::FnListener;
use nestwatch_engine::{EngineConfig, EngineEvent, MonitoringEngine, ProbeRegistry};
use nestwatch_failover::{FailoverConfig, FailoverController, NoOpTrafficRoutingAdapter};
use nestwatch_registry::{templates, Registry};
use nestwatch_storage::{InMemoryBackend, StorageAdapter, StorageConfig};
use std::sync::Arc;
use std::time::Duration;

const DEMO_NEST: &str = "demo-nest";

#[tokio::main]
async fn main() {
    println!("nestwatch — multi-tenant service monitoring");
    println!("=============================================\n");

    let storage = Arc::new(StorageAdapter::new(
        InMemoryBackend::new(),
        StorageConfig::builder(demo_master_key())
            .ttl_for("SERVICE_STATUS", Duration::from_secs(6 * 60 * 60))
            .ttl_for("MONITORING_DATA", Duration::from_secs(30 * 24 * 60 * 60))
            .build(),
    ));

    let registry = Arc::new(Registry::new(200));
    registry
        .register(templates::basic_web(
            "svc-homepage",
            DEMO_NEST,
            "homepage",
            "https://example.com",
        ))
        .expect("demo service definition is valid");

    let mut engine = MonitoringEngine::new(
        Arc::clone(&registry),
        Arc::clone(&storage),
        Arc::new(ProbeRegistry::noop()),
        EngineConfig::builder().build(),
    );
    engine.add_listener(FnListener::new(|event: &EngineEvent| {
        if let EngineEvent::StatusChanged { service_id, consecutive_failures, .. } = event {
            println!("[engine] {service_id} status changed (consecutive_failures={consecutive_failures})");
        }
    }));
    let engine = Arc::new(engine);
    engine.schedule_nest(DEMO_NEST);

    let failover = Arc::new(FailoverController::new(
        DEMO_NEST,
        Arc::clone(&storage),
        Arc::new(NoOpTrafficRoutingAdapter),
        FailoverConfig::builder().build(),
    ));

    let engine_task = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.run().await }
    });
    let failover_task = tokio::spawn({
        let failover = Arc::clone(&failover);
        async move { failover.run().await }
    });

    tokio::signal::ctrl_c().await.expect("failed to listen for ctrl-c");
    println!("\nshutting down");
    engine_task.abort();
    failover_task.abort();
}

fn demo_master_key() -> Vec<u8> {
    b"0123456789abcdef0123456789abcdef".to_vec()
}
