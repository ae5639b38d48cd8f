//! Error types for the connection pool.

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("timed out waiting for a connection after {0:?}")]
    AcquireTimeout(std::time::Duration),
    #[error("connection factory failed: {0}")]
    FactoryFailed(String),
    #[error("pool has been closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, PoolError>;
