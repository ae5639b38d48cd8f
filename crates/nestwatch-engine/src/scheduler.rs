//! Per-service periodic triggers. Every enabled service gets its own
//! `tokio::time::Interval` task; there is no global tick, so one slow
//! service can never delay another's schedule.

use nestwatch_registry::ServiceDescriptor;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// A fired trigger: "run this service's probe now".
pub struct Tick {
    pub descriptor: ServiceDescriptor,
}

struct Scheduled {
    handle: JoinHandle<()>,
    cancel: watch::Sender<bool>,
}

/// Owns one timer task per scheduled service. Adding a service starts its
/// timer; removing cancels it; updating restarts it with the new interval.
/// All ticks are sent to one channel the dispatcher drains.
pub struct Scheduler {
    tasks: Mutex<HashMap<String, Scheduled>>,
    tick_tx: mpsc::Sender<Tick>,
    startup_jitter_max: Duration,
}

impl Scheduler {
    pub fn new(tick_tx: mpsc::Sender<Tick>, startup_jitter_max: Duration) -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            tick_tx,
            startup_jitter_max,
        }
    }

    pub fn schedule(&self, descriptor: ServiceDescriptor) {
        self.cancel(&descriptor.service_id);

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let tick_tx = self.tick_tx.clone();
        let interval = descriptor.interval;
        let jitter = if self.startup_jitter_max.is_zero() {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::rng().random_range(0..self.startup_jitter_max.as_millis() as u64))
        };

        let handle = tokio::spawn(async move {
            tokio::time::sleep(jitter).await;
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if tick_tx.send(Tick { descriptor: descriptor.clone() }).await.is_err() {
                            return;
                        }
                    }
                    _ = cancel_rx.changed() => {
                        if *cancel_rx.borrow() {
                            return;
                        }
                    }
                }
            }
        });

        self.tasks.lock().unwrap().insert(
            descriptor.service_id.clone(),
            Scheduled {
                handle,
                cancel: cancel_tx,
            },
        );
    }

    pub fn cancel(&self, service_id: &str) {
        if let Some(scheduled) = self.tasks.lock().unwrap().remove(service_id) {
            let _ = scheduled.cancel.send(true);
            scheduled.handle.abort();
        }
    }

    /// Bypasses the schedule to run a service's probe immediately, without
    /// resetting its timer.
    pub async fn check_now(&self, descriptor: ServiceDescriptor) {
        let _ = self.tick_tx.send(Tick { descriptor }).await;
    }

    pub fn scheduled_count(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for (_, scheduled) in self.tasks.lock().unwrap().drain() {
            scheduled.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestwatch_registry::templates::basic_web;
    use std::time::Duration as StdDuration;

    #[tokio::test]
    async fn schedule_then_cancel_stops_further_ticks() {
        let (tx, mut rx) = mpsc::channel(16);
        let scheduler = Scheduler::new(tx, Duration::ZERO);

        let mut def = basic_web("svc-1", "acme", "one", "https://example.com");
        def.interval = StdDuration::from_millis(20);
        let descriptor = nestwatch_registry::ServiceDescriptor::from(&def);

        scheduler.schedule(descriptor);
        assert_eq!(scheduler.scheduled_count(), 1);

        let tick = rx.recv().await;
        assert!(tick.is_some());

        scheduler.cancel("svc-1");
        assert_eq!(scheduler.scheduled_count(), 0);
    }

    #[tokio::test]
    async fn check_now_does_not_require_scheduling() {
        let (tx, mut rx) = mpsc::channel(16);
        let scheduler = Scheduler::new(tx, Duration::ZERO);

        let def = basic_web("svc-1", "acme", "one", "https://example.com");
        let descriptor = nestwatch_registry::ServiceDescriptor::from(&def);
        scheduler.check_now(descriptor).await;

        assert!(rx.recv().await.is_some());
        assert_eq!(scheduler.scheduled_count(), 0);
    }
}
