//! Lifecycle events published by the storage adapter.

use nestwatch_core::ResilienceEvent;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum StorageEvent {
    Initialized {
        timestamp: Instant,
    },
    DataStored {
        timestamp: Instant,
        isolation_key: String,
        cached_only: bool,
    },
    DataDeleted {
        timestamp: Instant,
        isolation_key: String,
    },
    SyncCompleted {
        timestamp: Instant,
        synced: usize,
        failed: usize,
    },
}

impl ResilienceEvent for StorageEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StorageEvent::Initialized { .. } => "initialized",
            StorageEvent::DataStored { .. } => "data-stored",
            StorageEvent::DataDeleted { .. } => "data-deleted",
            StorageEvent::SyncCompleted { .. } => "sync-completed",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            StorageEvent::Initialized { timestamp }
            | StorageEvent::DataStored { timestamp, .. }
            | StorageEvent::DataDeleted { timestamp, .. }
            | StorageEvent::SyncCompleted { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        "storage-adapter"
    }
}
