//! Error types for probe execution and dispatch.

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("connection refused")]
    ConnectionRefused,
    #[error("connection timed out")]
    Timeout,
    #[error("TLS handshake failed: {0}")]
    TlsHandshake(String),
    #[error("DNS resolution failed: {0}")]
    Resolution(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("assertion failed: {0}")]
    AssertionFailed(String),
    #[error("probe exceeded its deadline")]
    DeadlineExceeded,
}

impl ProbeError {
    /// Transport-class errors are worth retrying; assertion failures are a
    /// semantic verdict and must not be retried.
    pub fn is_transport_class(&self) -> bool {
        matches!(
            self,
            ProbeError::ConnectionRefused
                | ProbeError::Timeout
                | ProbeError::TlsHandshake(_)
                | ProbeError::Resolution(_)
                | ProbeError::Transport(_)
                | ProbeError::DeadlineExceeded
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no probe registered for service type {0}")]
    UnknownServiceType(String),
    #[error("storage write failed: {0}")]
    Storage(#[from] nestwatch_storage::StorageError),
    #[error("dispatcher is shutting down")]
    ShuttingDown,
}

pub type Result<T> = std::result::Result<T, EngineError>;
