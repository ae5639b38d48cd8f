//! `MonitoringEngine`: the facade wiring the scheduler, dispatcher,
//! connectivity guard, and storage write-through together. This is the one
//! type the rest of the process talks to.

use crate::config::EngineConfig;
use crate::connectivity_guard::ConnectivityGuard;
use crate::dispatcher::Dispatcher;
use crate::events::EngineEvent;
use crate::probe::ProbeRegistry;
use crate::result::{CheckResult, CheckStatus};
use crate::scheduler::{Scheduler, Tick};
use nestwatch_core::events::{EventListener, EventListeners};
use nestwatch_core::health::{ComponentHealth, Health};
use nestwatch_registry::{Registry, RegistryEvent, ServiceDescriptor, ServiceStatus};
use nestwatch_storage::{ContentAddressedBackend, StorageAdapter};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::mpsc;

const SERVICE_STATUS: &str = "SERVICE_STATUS";
const MONITORING_DATA: &str = "MONITORING_DATA";

pub struct MonitoringEngine<B: ContentAddressedBackend> {
    registry: Arc<Registry>,
    scheduler: Arc<Scheduler>,
    dispatcher: Arc<Dispatcher>,
    connectivity_guard: Arc<ConnectivityGuard>,
    storage: Arc<StorageAdapter<B>>,
    events: EventListeners<EngineEvent>,
    tick_rx: Mutex<Option<mpsc::Receiver<Tick>>>,
    consecutive_failures: Mutex<HashMap<String, u32>>,
    running: AtomicBool,
}

impl<B: ContentAddressedBackend + Send + Sync + 'static> MonitoringEngine<B> {
    pub fn new(
        registry: Arc<Registry>,
        storage: Arc<StorageAdapter<B>>,
        probes: Arc<ProbeRegistry>,
        config: EngineConfig,
    ) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel(1024);
        let scheduler = Arc::new(Scheduler::new(tick_tx, config.startup_jitter_max));
        let dispatcher = Arc::new(Dispatcher::new(probes, config.concurrent_checks));
        let connectivity_guard = Arc::new(ConnectivityGuard::new(config.reference_urls, config.suppression_window));

        Self {
            registry,
            scheduler,
            dispatcher,
            connectivity_guard,
            storage,
            events: EventListeners::new(),
            tick_rx: Mutex::new(Some(tick_rx)),
            consecutive_failures: Mutex::new(HashMap::new()),
            running: AtomicBool::new(false),
        }
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: EventListener<EngineEvent> + 'static,
    {
        self.events.add(listener);
    }

    /// Schedules every currently-enabled service in `registry` and subscribes
    /// to future lifecycle events, then drains ticks until the engine is
    /// dropped. Call once; this does not return until the tick channel
    /// closes, so callers typically `tokio::spawn` it.
    pub async fn run(self: &Arc<Self>) {
        self.running.store(true, Ordering::SeqCst);

        let registry_listener_self = Arc::clone(self);
        self.registry.subscribe(Arc::new(move |event: &RegistryEvent| {
            registry_listener_self.on_registry_event(event);
        }));

        let mut tick_rx = self
            .tick_rx
            .lock()
            .unwrap()
            .take()
            .expect("MonitoringEngine::run must only be called once");

        while let Some(tick) = tick_rx.recv().await {
            let engine = Arc::clone(self);
            tokio::spawn(async move {
                engine.handle_tick(tick).await;
            });
        }
    }

    /// Schedules every currently-enabled service for a nest. Safe to call
    /// repeatedly; re-registers are idempotent on the scheduler side.
    pub fn schedule_nest(&self, nest_id: &str) {
        for descriptor in self.registry.list_for_nest(nest_id) {
            self.scheduler.schedule(descriptor);
        }
    }

    /// Bypasses the schedule to probe one service immediately.
    pub async fn check_now(&self, service_id: &str) -> Option<CheckResult> {
        let definition = self.registry.get(service_id)?;
        let descriptor = ServiceDescriptor::from(&definition);
        let result = self.dispatcher.dispatch(descriptor.clone()).await;
        self.handle_result(descriptor, result.clone()).await;
        Some(result)
    }

    fn on_registry_event(&self, event: &RegistryEvent) {
        match event {
            RegistryEvent::ServiceAdded(descriptor) | RegistryEvent::ServiceUpdated(descriptor) => {
                self.scheduler.schedule(descriptor.clone());
            }
            RegistryEvent::ServiceRemoved { service_id, .. } => {
                self.scheduler.cancel(service_id);
                self.consecutive_failures.lock().unwrap().remove(service_id);
            }
        }
    }

    async fn handle_tick(self: Arc<Self>, tick: Tick) {
        self.events.emit(&EngineEvent::ScheduleTick {
            pattern_name: "monitoring-engine".to_string(),
            timestamp: Instant::now(),
            service_id: tick.descriptor.service_id.clone(),
        });

        let result = self.dispatcher.dispatch(tick.descriptor.clone()).await;
        self.handle_result(tick.descriptor, result).await;
    }

    async fn handle_result(&self, descriptor: ServiceDescriptor, result: CheckResult) {
        let previous_status = descriptor.runtime.get().last_status;
        let new_status = to_service_status(result.status);

        descriptor.runtime.update(|shadow| {
            shadow.last_status = new_status;
            shadow.last_check = Some(result.timestamp);
            shadow.status_message = Some(result.message.clone());
            shadow.response_time = result.response_time;
        });

        self.events.emit(&EngineEvent::CheckResult {
            pattern_name: "monitoring-engine".to_string(),
            timestamp: Instant::now(),
            result: Box::new(result.clone()),
        });

        let consecutive_failures = self.track_consecutive_failures(&descriptor.service_id, result.status);

        if let Ok(payload) = serde_json::to_vec(&result) {
            let _ = self.storage.store(&descriptor.nest_id, SERVICE_STATUS, &payload, Some(&descriptor.service_id)).await;
        }

        if previous_status == new_status {
            return;
        }

        if result.status == CheckStatus::Down {
            if self.connectivity_guard.is_suppressing() {
                return;
            }
            if self.connectivity_guard.check().await {
                self.events.emit(&EngineEvent::EnvironmentUnreachable {
                    pattern_name: "monitoring-engine".to_string(),
                    timestamp: Instant::now(),
                    reference_failures: 1,
                });
                return;
            }
        }

        if let Ok(payload) = serde_json::to_vec(&result) {
            let key = format!("{}:{}", descriptor.service_id, consecutive_failures);
            let _ = self.storage.store(&descriptor.nest_id, MONITORING_DATA, &payload, Some(&key)).await;
        }

        self.events.emit(&EngineEvent::StatusChanged {
            pattern_name: "monitoring-engine".to_string(),
            timestamp: Instant::now(),
            service_id: descriptor.service_id,
            consecutive_failures,
        });
    }

    fn track_consecutive_failures(&self, service_id: &str, status: CheckStatus) -> u32 {
        let mut failures = self.consecutive_failures.lock().unwrap();
        let entry = failures.entry(service_id.to_string()).or_insert(0);
        if status == CheckStatus::Down {
            *entry += 1;
        } else {
            *entry = 0;
        }
        *entry
    }
}

fn to_service_status(status: CheckStatus) -> ServiceStatus {
    match status {
        CheckStatus::Up => ServiceStatus::Up,
        CheckStatus::Down => ServiceStatus::Down,
        CheckStatus::Degraded => ServiceStatus::Degraded,
        CheckStatus::Unknown => ServiceStatus::Unknown,
    }
}

impl<B: ContentAddressedBackend + Send + Sync + 'static> Health for MonitoringEngine<B> {
    fn health(&self) -> ComponentHealth {
        if self.running.load(Ordering::SeqCst) {
            ComponentHealth::healthy().with_detail("scheduled_services", self.scheduler.scheduled_count().to_string())
        } else {
            ComponentHealth::unhealthy("engine not running")
        }
    }
}
