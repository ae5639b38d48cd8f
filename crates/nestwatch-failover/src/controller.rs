//! `FailoverController`: samples endpoint health, evaluates trigger rules,
//! and drives strategy execution and automatic recovery. The facade other
//! components depend on, mirroring `nestwatch_engine::MonitoringEngine`'s
//! shape for the failover half of the system.

use crate::config::FailoverConfig;
use crate::error::{FailoverError, Result};
use crate::events::ControllerEvent;
use crate::health_sampler::HealthSampler;
use crate::registry::EndpointRegistry;
use crate::rules;
use crate::selection::TargetSelector;
use crate::routing::TrafficRoutingAdapter;
use crate::strategy::RampSchedule;
use crate::types::{
    EndpointStatus, FailoverEvent, FailoverEventStatus, FailoverRule, FailoverStrategyKind, RecoveryStrategyKind, ServiceEndpoint,
};
use nestwatch_core::events::{EventListener, EventListeners};
use nestwatch_storage::{ContentAddressedBackend, StorageAdapter};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::Semaphore;

const FAILOVER_CONFIG: &str = "FAILOVER_CONFIG";
const RECOVERY_MONITOR_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);

pub struct FailoverController<B: ContentAddressedBackend> {
    nest_id: String,
    registry: Arc<EndpointRegistry>,
    sampler: HealthSampler,
    selector: TargetSelector,
    routing: Arc<dyn TrafficRoutingAdapter>,
    storage: Arc<StorageAdapter<B>>,
    config: FailoverConfig,
    events: EventListeners<ControllerEvent>,
    cooldowns: Mutex<HashMap<String, Instant>>,
    concurrency: Arc<Semaphore>,
}

impl<B: ContentAddressedBackend + Send + Sync + 'static> FailoverController<B> {
    pub fn new(nest_id: impl Into<String>, storage: Arc<StorageAdapter<B>>, routing: Arc<dyn TrafficRoutingAdapter>, config: FailoverConfig) -> Self {
        let registry = Arc::new(EndpointRegistry::new());
        let sampler = HealthSampler::new(Arc::clone(&registry), config.health_check_timeout);
        Self {
            nest_id: nest_id.into(),
            concurrency: Arc::new(Semaphore::new(config.max_concurrent_failovers)),
            registry,
            sampler,
            selector: TargetSelector::new(),
            routing,
            storage,
            config,
            events: EventListeners::new(),
            cooldowns: Mutex::new(HashMap::new()),
        }
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: EventListener<ControllerEvent> + 'static,
    {
        self.events.add(listener);
    }

    pub async fn register_endpoint(&self, endpoint: ServiceEndpoint) -> Result<()> {
        let payload = serde_json::to_vec(&endpoint).map_err(|e| FailoverError::Storage(nestwatch_storage::StorageError::Codec(e.to_string())))?;
        self.storage.store(&self.nest_id, FAILOVER_CONFIG, &payload, Some(&format!("endpoint:{}", endpoint.id))).await?;
        self.registry.register_endpoint(endpoint);
        Ok(())
    }

    pub async fn register_rule(&self, rule: FailoverRule) -> Result<()> {
        let payload = serde_json::to_vec(&rule).map_err(|e| FailoverError::Storage(nestwatch_storage::StorageError::Codec(e.to_string())))?;
        self.storage.store(&self.nest_id, FAILOVER_CONFIG, &payload, Some(&format!("rule:{}", rule.id))).await?;
        self.registry.register_rule(rule)?;
        Ok(())
    }

    pub fn endpoint(&self, id: &str) -> Option<ServiceEndpoint> {
        self.registry.get_endpoint(id)
    }

    /// Spawns the health-sampling and rule-detection loops. Runs until the
    /// process exits; there is no graceful-stop handle, matching the other
    /// long-lived component facades in this workspace.
    pub async fn run(self: &Arc<Self>) {
        let sampler_self = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sampler_self.config.health_check_interval);
            loop {
                ticker.tick().await;
                sampler_self.sampler.sample_once().await;
            }
        });

        let detection_self = Arc::clone(self);
        let mut ticker = tokio::time::interval(self.config.detection_interval);
        loop {
            ticker.tick().await;
            detection_self.detect_and_trigger().await;
        }
    }

    /// Rule detection is serialized per endpoint: all of a rule's candidate
    /// endpoints are evaluated one at a time so a condition snapshot always
    /// reflects metrics as of its own evaluation, never a sibling's.
    async fn detect_and_trigger(self: &Arc<Self>) {
        let now = Instant::now();
        for rule in self.registry.list_rules() {
            if !rule.enabled {
                continue;
            }
            if self.in_cooldown(&rule.id, now) {
                continue;
            }
            let Ok(candidates) = self.registry.endpoints_matching(&rule) else {
                continue;
            };
            for source in &candidates {
                if source.status == EndpointStatus::Maintenance {
                    continue;
                }
                let Some(snapshots) = self.registry.with_metrics(&source.id, |m| rules::evaluate(&rule.trigger_conditions, m, now)) else {
                    continue;
                };
                if !rules::all_hold(&snapshots) {
                    continue;
                }

                let others: Vec<ServiceEndpoint> = candidates
                    .iter()
                    .filter(|e| e.id != source.id && e.status == EndpointStatus::Healthy)
                    .cloned()
                    .collect();
                let Some(target) = self.selector.select(&rule.id, rule.selection_mode, &source.region, &others).cloned() else {
                    continue;
                };

                self.mark_cooldown(&rule.id, now);
                let controller = Arc::clone(self);
                let rule = rule.clone();
                let source = source.clone();
                tokio::spawn(async move {
                    controller.run_failover(rule, source, target, snapshots).await;
                });
            }
        }
    }

    fn in_cooldown(&self, rule_id: &str, now: Instant) -> bool {
        let cooldowns = self.cooldowns.lock().unwrap();
        match cooldowns.get(rule_id) {
            Some(started) => {
                let rule_cooldown = self.registry.get_rule(rule_id).map(|r| r.cooldown_period).unwrap_or_default();
                now.duration_since(*started) < rule_cooldown
            }
            None => false,
        }
    }

    fn mark_cooldown(&self, rule_id: &str, now: Instant) {
        self.cooldowns.lock().unwrap().insert(rule_id.to_string(), now);
    }

    async fn run_failover(self: Arc<Self>, rule: FailoverRule, source: ServiceEndpoint, target: ServiceEndpoint, snapshots: Vec<crate::types::TriggerConditionSnapshot>) {
        let Ok(_permit) = self.concurrency.clone().acquire_owned().await else { return };

        let started = Instant::now();
        let mut event = FailoverEvent {
            id: format!("fo-{}-{}", rule.id, next_event_ordinal()),
            timestamp: SystemTime::now(),
            rule_id: rule.id.clone(),
            source_endpoint: source.id.clone(),
            target_endpoint: Some(target.id.clone()),
            status: FailoverEventStatus::Triggered,
            conditions_snapshot: snapshots,
            affected_connections: source.current_load as u64,
            duration: None,
            recovered_at: None,
        };

        self.emit(ControllerEvent::FailoverTriggered { pattern_name: rule.name.clone(), timestamp: Instant::now(), event: Box::new(event.clone()) });
        self.persist_event(&event).await;

        event.status = FailoverEventStatus::InProgress;
        let outcome = self.execute_strategy(&rule.failover_strategy, &source, &target).await;

        event.duration = Some(started.elapsed());
        match outcome {
            Ok(()) => {
                event.status = FailoverEventStatus::Completed;
                self.registry.set_status(&source.id, EndpointStatus::Unhealthy);
                self.emit(ControllerEvent::FailoverCompleted { pattern_name: rule.name.clone(), timestamp: Instant::now(), event: Box::new(event.clone()) });
            }
            Err(_) => {
                event.status = FailoverEventStatus::Failed;
                self.emit(ControllerEvent::FailoverFailed { pattern_name: rule.name.clone(), timestamp: Instant::now(), event: Box::new(event.clone()) });
            }
        }
        self.persist_event(&event).await;

        if event.status == FailoverEventStatus::Completed {
            if let RecoveryStrategyKind::Automatic { .. } = rule.recovery_strategy {
                let controller = Arc::clone(&self);
                tokio::spawn(async move {
                    controller.monitor_recovery(rule, source, target, event).await;
                });
            }
        }
    }

    async fn execute_strategy(&self, strategy: &FailoverStrategyKind, source: &ServiceEndpoint, target: &ServiceEndpoint) -> Result<()> {
        match strategy {
            FailoverStrategyKind::Immediate => {
                self.routing.redirect(&source.id, &target.id, 100).await;
                Ok(())
            }
            FailoverStrategyKind::Gradual { steps } => {
                let schedule = RampSchedule::even_steps(*steps, Duration::from_secs(30));
                for pct in schedule.steps() {
                    self.routing.redirect(&source.id, &target.id, *pct).await;
                    tokio::time::sleep(schedule.step_interval()).await;
                }
                Ok(())
            }
            FailoverStrategyKind::BlueGreen => {
                if target.status != EndpointStatus::Healthy {
                    return Err(FailoverError::TargetNotReady(target.id.clone()));
                }
                self.routing.redirect(&source.id, &target.id, 100).await;
                Ok(())
            }
            FailoverStrategyKind::Canary { steps } => {
                let schedule = RampSchedule::even_steps(*steps, Duration::from_secs(60));
                for pct in schedule.steps() {
                    self.routing.redirect(&source.id, &target.id, *pct).await;
                    tokio::time::sleep(schedule.step_interval()).await;
                    if target.status != EndpointStatus::Healthy {
                        return Err(FailoverError::TargetNotReady(target.id.clone()));
                    }
                }
                Ok(())
            }
        }
    }

    /// Watches `source` for `consecutive_success_required` clean health
    /// samples, then ramps traffic back per `RecoveryStrategyKind::Automatic`.
    /// Gives up after 24h without forcing a verdict either way.
    async fn monitor_recovery(self: Arc<Self>, rule: FailoverRule, source: ServiceEndpoint, target: ServiceEndpoint, mut event: FailoverEvent) {
        let RecoveryStrategyKind::Automatic { consecutive_success_required, recovery_delay, initial_percentage, increment_percentage, increment_interval } = rule.recovery_strategy else {
            return;
        };

        let deadline = Instant::now() + RECOVERY_MONITOR_EXPIRY;
        let mut consecutive = 0u32;
        let mut ticker = tokio::time::interval(self.config.health_check_interval);
        while consecutive < consecutive_success_required {
            ticker.tick().await;
            if Instant::now() > deadline {
                return;
            }
            match self.registry.get_endpoint(&source.id) {
                Some(e) if e.status == EndpointStatus::Healthy => consecutive += 1,
                Some(_) => consecutive = 0,
                None => return,
            }
        }

        tokio::time::sleep(recovery_delay).await;

        event.status = FailoverEventStatus::Recovering;
        self.persist_event(&event).await;

        let schedule = RampSchedule::ramp_up(initial_percentage, increment_percentage, increment_interval);
        for pct in schedule.steps() {
            self.routing.redirect(&target.id, &source.id, *pct).await;
            tokio::time::sleep(schedule.step_interval()).await;
        }

        self.registry.set_status(&source.id, EndpointStatus::Healthy);
        event.status = FailoverEventStatus::Recovered;
        event.recovered_at = Some(SystemTime::now());
        self.persist_event(&event).await;
        self.emit(ControllerEvent::FailoverRecovered { pattern_name: rule.name, timestamp: Instant::now(), event: Box::new(event) });
    }

    async fn persist_event(&self, event: &FailoverEvent) {
        let Ok(payload) = serde_json::to_vec(event) else { return };
        let _ = self.storage.store(&self.nest_id, FAILOVER_CONFIG, &payload, Some(&format!("event:{}", event.id))).await;
    }

    fn emit(&self, event: ControllerEvent) {
        self.events.emit(&event);
    }
}

fn next_event_ordinal() -> u64 {
    static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
}
