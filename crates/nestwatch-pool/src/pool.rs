//! The pool itself: idle-connection reuse, capped concurrency, idle/lifetime
//! eviction, and a background sweep that re-validates idle connections and
//! refills up to `min`.

use crate::config::PoolConfig;
use crate::error::{PoolError, Result};
use crate::events::{DestroyReason, PoolEvent};
use crate::factory::ConnectionFactory;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::AbortHandle;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

struct Idle<T> {
    conn: T,
    created_at: Instant,
    idle_since: Instant,
}

/// Snapshot of pool occupancy, exposed for observability.
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    pub active: usize,
    pub idle: usize,
    pub waiting: usize,
}

struct Shared<T, F> {
    factory: F,
    config: PoolConfig,
    idle: Mutex<VecDeque<Idle<T>>>,
    semaphore: Semaphore,
    active: AtomicUsize,
    waiting: AtomicUsize,
}

/// A generic async connection pool keyed to a single [`ConnectionFactory`].
pub struct Pool<T, F: ConnectionFactory<T>> {
    shared: Arc<Shared<T, F>>,
    sweep_handle: AbortHandle,
}

impl<T, F> Pool<T, F>
where
    T: Send + 'static,
    F: ConnectionFactory<T> + Send + Sync + 'static,
{
    pub fn new(factory: F, config: PoolConfig) -> Self {
        let shared = Arc::new(Shared {
            factory,
            semaphore: Semaphore::new(config.max),
            idle: Mutex::new(VecDeque::new()),
            active: AtomicUsize::new(0),
            waiting: AtomicUsize::new(0),
            config,
        });

        let sweep_shared = Arc::clone(&shared);
        let sweep_handle = tokio::spawn(async move {
            Self::background_sweep(sweep_shared).await;
        })
        .abort_handle();

        Self {
            shared,
            sweep_handle,
        }
    }

    /// Returns an idle connection if one passes validation, otherwise creates
    /// a new one (up to `max`), otherwise waits up to `acquireTimeout`.
    pub async fn acquire(&self) -> Result<PooledConnection<T, F>> {
        let start = Instant::now();
        self.shared.waiting.fetch_add(1, Ordering::SeqCst);

        let permit_fut = self.shared.semaphore.clone().acquire_owned();
        let permit = tokio::time::timeout(self.shared.config.acquire_timeout, permit_fut).await;
        self.shared.waiting.fetch_sub(1, Ordering::SeqCst);

        let permit = match permit {
            Ok(Ok(permit)) => permit,
            _ => {
                self.shared.config.event_listeners.emit(&PoolEvent::AcquireTimedOut {
                    pattern_name: self.shared.config.name.clone(),
                    timestamp: Instant::now(),
                });
                return Err(PoolError::AcquireTimeout(self.shared.config.acquire_timeout));
            }
        };

        let conn = loop {
            let popped = self.shared.idle.lock().unwrap().pop_front();
            match popped {
                Some(idle) => {
                    if self.shared.factory.validate(&idle.conn).await {
                        break idle.conn;
                    }
                    self.emit_destroyed(DestroyReason::FailedValidation);
                    continue;
                }
                None => break self.create_connection().await?,
            }
        };

        self.shared.active.fetch_add(1, Ordering::SeqCst);
        self.shared.config.event_listeners.emit(&PoolEvent::AcquireSucceeded {
            pattern_name: self.shared.config.name.clone(),
            timestamp: Instant::now(),
            wait: start.elapsed(),
        });

        Ok(PooledConnection {
            conn: Some(conn),
            created_at: Instant::now(),
            shared: Arc::clone(&self.shared),
            _permit: permit,
        })
    }

    async fn create_connection(&self) -> Result<T> {
        let conn = self
            .shared
            .factory
            .create()
            .await
            .map_err(PoolError::FactoryFailed)?;
        self.shared.config.event_listeners.emit(&PoolEvent::ConnectionCreated {
            pattern_name: self.shared.config.name.clone(),
            timestamp: Instant::now(),
            pool_size: self.shared.active.load(Ordering::SeqCst) + 1,
        });
        Ok(conn)
    }

    fn emit_destroyed(&self, reason: DestroyReason) {
        self.shared.config.event_listeners.emit(&PoolEvent::ConnectionDestroyed {
            pattern_name: self.shared.config.name.clone(),
            timestamp: Instant::now(),
            reason,
        });
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            active: self.shared.active.load(Ordering::SeqCst),
            idle: self.shared.idle.lock().unwrap().len(),
            waiting: self.shared.waiting.load(Ordering::SeqCst),
        }
    }

    async fn background_sweep(shared: Arc<Shared<T, F>>) {
        let mut ticker = tokio::time::interval(shared.config.health_check_interval);
        loop {
            ticker.tick().await;

            let expired: Vec<Idle<T>> = {
                let mut idle = shared.idle.lock().unwrap();
                let mut keep = VecDeque::with_capacity(idle.len());
                let mut expired = Vec::new();
                while let Some(entry) = idle.pop_front() {
                    if Self::is_expired(&entry, &shared.config) {
                        expired.push(entry);
                    } else {
                        keep.push_back(entry);
                    }
                }
                *idle = keep;
                expired
            };

            for _ in expired {
                shared.config.event_listeners.emit(&PoolEvent::ConnectionDestroyed {
                    pattern_name: shared.config.name.clone(),
                    timestamp: Instant::now(),
                    reason: DestroyReason::IdleTimeoutExceeded,
                });
            }

            let validated_out: Vec<usize> = {
                let idle = shared.idle.lock().unwrap();
                (0..idle.len()).collect()
            };
            for i in validated_out.into_iter().rev() {
                let conn = {
                    let mut idle = shared.idle.lock().unwrap();
                    if i < idle.len() {
                        idle.remove(i)
                    } else {
                        None
                    }
                };
                if let Some(entry) = conn {
                    if shared.factory.validate(&entry.conn).await {
                        shared.idle.lock().unwrap().push_back(entry);
                    } else {
                        #[cfg(feature = "tracing")]
                        warn!(pool = %shared.config.name, "idle connection failed validation");
                        shared.config.event_listeners.emit(&PoolEvent::HealthCheckFailed {
                            pattern_name: shared.config.name.clone(),
                            timestamp: Instant::now(),
                        });
                    }
                }
            }

            let current_total = shared.active.load(Ordering::SeqCst) + shared.idle.lock().unwrap().len();
            if current_total < shared.config.min {
                #[cfg(feature = "tracing")]
                debug!(pool = %shared.config.name, current_total, min = shared.config.min, "refilling pool");
                for _ in current_total..shared.config.min {
                    if let Ok(conn) = shared.factory.create().await {
                        shared.idle.lock().unwrap().push_back(Idle {
                            conn,
                            created_at: Instant::now(),
                            idle_since: Instant::now(),
                        });
                    }
                }
            }
        }
    }

    fn is_expired(entry: &Idle<T>, config: &PoolConfig) -> bool {
        if let Some(max_lifetime) = config.max_lifetime {
            if entry.created_at.elapsed() > max_lifetime {
                return true;
            }
        }
        if let Some(idle_timeout) = config.idle_timeout {
            if entry.idle_since.elapsed() > idle_timeout {
                return true;
            }
        }
        false
    }
}

impl<T, F: ConnectionFactory<T>> Drop for Pool<T, F> {
    fn drop(&mut self) {
        self.sweep_handle.abort();
    }
}

/// A checked-out connection. Returns itself to the idle set on drop unless
/// it has outlived `maxLifetime`.
pub struct PooledConnection<T, F: ConnectionFactory<T>> {
    conn: Option<T>,
    created_at: Instant,
    shared: Arc<Shared<T, F>>,
    _permit: tokio::sync::OwnedSemaphorePermit,
}

impl<T, F: ConnectionFactory<T>> std::ops::Deref for PooledConnection<T, F> {
    type Target = T;
    fn deref(&self) -> &T {
        self.conn.as_ref().expect("connection taken only on drop")
    }
}

impl<T, F: ConnectionFactory<T>> std::ops::DerefMut for PooledConnection<T, F> {
    fn deref_mut(&mut self) -> &mut T {
        self.conn.as_mut().expect("connection taken only on drop")
    }
}

impl<T, F: ConnectionFactory<T>> Drop for PooledConnection<T, F> {
    fn drop(&mut self) {
        self.shared.active.fetch_sub(1, Ordering::SeqCst);
        let Some(conn) = self.conn.take() else { return };

        let expired = self
            .shared
            .config
            .max_lifetime
            .is_some_and(|max| self.created_at.elapsed() > max);

        if expired {
            self.shared.config.event_listeners.emit(&PoolEvent::ConnectionDestroyed {
                pattern_name: self.shared.config.name.clone(),
                timestamp: Instant::now(),
                reason: DestroyReason::MaxLifetimeExceeded,
            });
            return;
        }

        self.shared.idle.lock().unwrap().push_back(Idle {
            conn,
            created_at: self.created_at,
            idle_since: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    struct CountingFactory {
        created: Arc<AtomicU32>,
    }

    impl ConnectionFactory<u32> for CountingFactory {
        async fn create(&self) -> std::result::Result<u32, String> {
            Ok(self.created.fetch_add(1, Ordering::SeqCst))
        }
    }

    #[tokio::test]
    async fn acquire_creates_up_to_max_then_reuses() {
        let created = Arc::new(AtomicU32::new(0));
        let pool = Pool::new(
            CountingFactory { created: Arc::clone(&created) },
            PoolConfig::builder().min(0).max(2).build(),
        );

        let a = pool.acquire().await.unwrap();
        let b = pool.acquire().await.unwrap();
        assert_eq!(created.load(Ordering::SeqCst), 2);

        drop(a);
        let c = pool.acquire().await.unwrap();
        // Reused the connection `a` released instead of creating a third.
        assert_eq!(created.load(Ordering::SeqCst), 2);
        drop(b);
        drop(c);
    }

    #[tokio::test]
    async fn acquire_times_out_when_pool_is_exhausted() {
        let created = Arc::new(AtomicU32::new(0));
        let pool = Pool::new(
            CountingFactory { created },
            PoolConfig::builder()
                .min(0)
                .max(1)
                .acquire_timeout(Duration::from_millis(30))
                .build(),
        );

        let _held = pool.acquire().await.unwrap();
        let result = pool.acquire().await;
        assert!(matches!(result, Err(PoolError::AcquireTimeout(_))));
    }

    #[tokio::test]
    async fn stats_reflect_active_and_idle() {
        let created = Arc::new(AtomicU32::new(0));
        let pool = Pool::new(
            CountingFactory { created },
            PoolConfig::builder().min(0).max(3).build(),
        );

        let a = pool.acquire().await.unwrap();
        let stats = pool.stats();
        assert_eq!(stats.active, 1);
        drop(a);
    }
}
