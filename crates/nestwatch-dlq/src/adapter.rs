//! The message broker is an injected collaborator; only its publish
//! contract matters here.

use crate::message::DlqHeaders;
use std::future::Future;
use std::time::Duration;

pub trait QueueAdapter: Send + Sync {
    /// Republishes to `<originalQueue>.retry` with the given expiration in
    /// milliseconds; the broker is expected to dead-letter it back to the
    /// original queue on expiry.
    fn publish_retry(
        &self,
        headers: &DlqHeaders,
        expiration: Duration,
    ) -> impl Future<Output = Result<(), String>> + Send;

    /// Parks a permanently-failed message on `<originalQueue>.dlq` bounded by
    /// `messageTtl`.
    fn publish_dlq(
        &self,
        headers: &DlqHeaders,
        message_ttl: Duration,
    ) -> impl Future<Output = Result<(), String>> + Send;
}

/// In-memory adapter recording publishes, for tests and local runs.
#[derive(Default)]
pub struct InMemoryQueueAdapter {
    pub retries: std::sync::Mutex<Vec<DlqHeaders>>,
    pub parked: std::sync::Mutex<Vec<DlqHeaders>>,
}

impl InMemoryQueueAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueueAdapter for InMemoryQueueAdapter {
    async fn publish_retry(&self, headers: &DlqHeaders, _expiration: Duration) -> Result<(), String> {
        self.retries.lock().unwrap().push(headers.clone());
        Ok(())
    }

    async fn publish_dlq(&self, headers: &DlqHeaders, _message_ttl: Duration) -> Result<(), String> {
        self.parked.lock().unwrap().push(headers.clone());
        Ok(())
    }
}
