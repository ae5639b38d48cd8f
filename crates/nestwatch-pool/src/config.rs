//! Configuration for the connection pool.

use crate::events::PoolEvent;
use nestwatch_core::events::{EventListeners, FnListener};
use std::time::Duration;

#[derive(Clone)]
pub struct PoolConfig {
    pub(crate) min: usize,
    pub(crate) max: usize,
    pub(crate) acquire_timeout: Duration,
    pub(crate) max_lifetime: Option<Duration>,
    pub(crate) idle_timeout: Option<Duration>,
    pub(crate) health_check_interval: Duration,
    pub(crate) name: String,
    pub(crate) event_listeners: EventListeners<PoolEvent>,
}

impl PoolConfig {
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::new()
    }
}

pub struct PoolConfigBuilder {
    min: usize,
    max: usize,
    acquire_timeout: Duration,
    max_lifetime: Option<Duration>,
    idle_timeout: Option<Duration>,
    health_check_interval: Duration,
    name: String,
    event_listeners: EventListeners<PoolEvent>,
}

impl PoolConfigBuilder {
    pub fn new() -> Self {
        Self {
            min: 1,
            max: 10,
            acquire_timeout: Duration::from_secs(5),
            max_lifetime: Some(Duration::from_secs(30 * 60)),
            idle_timeout: Some(Duration::from_secs(10 * 60)),
            health_check_interval: Duration::from_secs(30),
            name: "pool".to_string(),
            event_listeners: EventListeners::new(),
        }
    }

    /// Minimum number of connections the pool refills to after destruction.
    ///
    /// Default: 1
    pub fn min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    /// Maximum number of live connections at once.
    ///
    /// Default: 10
    pub fn max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    /// How long `acquire` waits for an idle or newly created connection
    /// before returning `PoolError::AcquireTimeout`.
    ///
    /// Default: 5s
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Connections older than this are destroyed on release rather than
    /// returned to the idle set. `None` disables lifetime eviction.
    ///
    /// Default: 30 minutes
    pub fn max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    /// Idle connections unused for longer than this are destroyed by the
    /// background sweep. `None` disables idle eviction.
    ///
    /// Default: 10 minutes
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Interval at which the background sweep re-validates idle connections
    /// and refills the pool to `min`.
    ///
    /// Default: 30s
    pub fn health_check_interval(mut self, interval: Duration) -> Self {
        self.health_check_interval = interval;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&PoolEvent) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(f));
        self
    }

    pub fn build(self) -> PoolConfig {
        assert!(self.min <= self.max, "pool min must be <= max");
        assert!(self.max > 0, "pool max must be > 0");
        PoolConfig {
            min: self.min,
            max: self.max,
            acquire_timeout: self.acquire_timeout,
            max_lifetime: self.max_lifetime,
            idle_timeout: self.idle_timeout,
            health_check_interval: self.health_check_interval,
            name: self.name,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for PoolConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
