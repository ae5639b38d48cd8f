//! Error types for endpoint registration and failover execution.

#[derive(Debug, thiserror::Error)]
pub enum FailoverError {
    #[error("unknown endpoint {0}")]
    UnknownEndpoint(String),
    #[error("unknown rule {0}")]
    UnknownRule(String),
    #[error("invalid servicePattern regex: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("no healthy target endpoint available")]
    NoHealthyTarget,
    #[error("target readiness check failed: {0}")]
    TargetNotReady(String),
    #[error("storage write failed: {0}")]
    Storage(#[from] nestwatch_storage::StorageError),
}

pub type Result<T> = std::result::Result<T, FailoverError>;
