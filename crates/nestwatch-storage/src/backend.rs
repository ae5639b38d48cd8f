//! The content-addressed backend the adapter writes through to. Injected so
//! production wires in the real decentralized store while tests and local
//! runs use the in-memory implementation.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

pub trait ContentAddressedBackend: Send + Sync {
    /// Writes `bytes` and returns a content id, computed by the backend
    /// (typically a content hash).
    fn put(&self, bytes: Vec<u8>) -> impl Future<Output = Result<String, BackendError>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = Result<Option<Vec<u8>>, BackendError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), BackendError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("backend rejected write: {0}")]
    Rejected(String),
}

/// In-memory backend keyed by a SHA-256 content hash. Suitable for tests and
/// single-process deployments; production backends wrap the real
/// decentralized store.
#[derive(Default)]
pub struct InMemoryBackend {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn content_id(bytes: &[u8]) -> String {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(bytes);
        hex_encode(&digest)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

impl ContentAddressedBackend for InMemoryBackend {
    async fn put(&self, bytes: Vec<u8>) -> Result<String, BackendError> {
        let id = Self::content_id(&bytes);
        self.objects.lock().unwrap().insert(id.clone(), bytes);
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>, BackendError> {
        Ok(self.objects.lock().unwrap().get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<(), BackendError> {
        self.objects.lock().unwrap().remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_retrieves_by_content_id() {
        let backend = InMemoryBackend::new();
        let id = backend.put(b"payload".to_vec()).await.unwrap();
        let got = backend.get(&id).await.unwrap();
        assert_eq!(got, Some(b"payload".to_vec()));
    }

    #[tokio::test]
    async fn identical_content_yields_identical_id() {
        let backend = InMemoryBackend::new();
        let id1 = backend.put(b"same".to_vec()).await.unwrap();
        let id2 = backend.put(b"same".to_vec()).await.unwrap();
        assert_eq!(id1, id2);
    }

    #[tokio::test]
    async fn delete_removes_the_object() {
        let backend = InMemoryBackend::new();
        let id = backend.put(b"gone soon".to_vec()).await.unwrap();
        backend.delete(&id).await.unwrap();
        assert_eq!(backend.get(&id).await.unwrap(), None);
    }
}
