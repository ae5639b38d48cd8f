//! Error types for the service-definition registry.

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid target for type {service_type:?}: {reason}")]
    InvalidTarget { service_type: String, reason: String },
    #[error("interval must be between 30s and 24h, got {0:?}")]
    IntervalOutOfBounds(std::time::Duration),
    #[error("missing required configuration for type {0}")]
    MissingTypeConfig(String),
    #[error("tag {0:?} does not match the configured naming pattern")]
    TagPatternMismatch(String),
    #[error("nest {nest_id} has reached its service cap of {cap}")]
    TenantCapExceeded { nest_id: String, cap: usize },
    #[error("service {0} not found")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
