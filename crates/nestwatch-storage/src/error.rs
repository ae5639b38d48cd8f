//! Error types for the tenant storage adapter.

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid nest id: {0}")]
    InvalidNestId(String),
    #[error("invalid data type: {0}")]
    InvalidDataType(String),
    #[error("malformed isolation key: {0}")]
    MalformedKey(String),
    #[error("cross-tenant access rejected: expected nest {expected}, found {found}")]
    CrossTenantAccess { expected: String, found: String },
    #[error("encryption failed")]
    Encryption,
    #[error("decryption failed (wrong nest id or corrupted payload)")]
    Decryption,
    #[error("codec error: {0}")]
    Codec(String),
    #[error("backend error: {0}")]
    Backend(#[from] crate::backend::BackendError),
    #[error("entry not found")]
    NotFound,
}
