//! Generic async connection pool.
//!
//! Keeps `[min, max]` live connections produced by an injected
//! [`ConnectionFactory`]. `acquire` hands back an idle, re-validated
//! connection or creates a new one up to `max`; beyond that it waits for a
//! release up to `acquireTimeout`. A background sweep destroys connections
//! past `maxLifetime`/`idleTimeout` and refills the pool back to `min`.
//!
//! ```rust
//! use nestwatch_pool::{ConnectionFactory, Pool, PoolConfig};
//!
//! struct DummyFactory;
//! impl ConnectionFactory<u32> for DummyFactory {
//!     async fn create(&self) -> Result<u32, String> {
//!         Ok(1)
//!     }
//! }
//!
//! # async fn example() {
//! let pool = Pool::new(DummyFactory, PoolConfig::builder().max(5).build());
//! let conn = pool.acquire().await.unwrap();
//! assert_eq!(*conn, 1);
//! # }
//! ```

mod config;
mod error;
mod events;
mod factory;
mod pool;

pub use config::{PoolConfig, PoolConfigBuilder};
pub use error::{PoolError, Result};
pub use events::{DestroyReason, PoolEvent};
pub use factory::ConnectionFactory;
pub use pool::{Pool, PoolStats, PooledConnection};
