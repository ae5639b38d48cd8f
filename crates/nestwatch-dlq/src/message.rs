//! The header set carried by a message as it moves between the original
//! queue, its `.retry` companion, and its `.dlq` companion.

use std::time::SystemTime;

#[derive(Debug, Clone)]
pub struct DlqHeaders {
    pub message_id: String,
    pub original_queue: String,
    pub original_exchange: Option<String>,
    pub original_routing_key: String,
    pub retry_count: u32,
    pub first_failed_at: SystemTime,
    pub last_error: String,
}

impl DlqHeaders {
    pub fn first_failure(
        message_id: impl Into<String>,
        original_queue: impl Into<String>,
        original_routing_key: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            original_queue: original_queue.into(),
            original_exchange: None,
            original_routing_key: original_routing_key.into(),
            retry_count: 0,
            first_failed_at: SystemTime::now(),
            last_error: error.into(),
        }
    }

    /// Headers for the next retry, with the count incremented and the error
    /// replaced by the latest failure.
    pub fn for_next_retry(&self, error: impl Into<String>) -> Self {
        Self {
            retry_count: self.retry_count + 1,
            last_error: error.into(),
            ..self.clone()
        }
    }
}
