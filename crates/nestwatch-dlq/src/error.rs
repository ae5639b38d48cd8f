//! Error types for the dead-letter queue.

#[derive(Debug, thiserror::Error)]
pub enum DlqError {
    #[error("queue adapter rejected publish: {0}")]
    PublishFailed(String),
}

pub type Result<T> = std::result::Result<T, DlqError>;
