//! Tenant-isolated storage adapter over a content-addressed backend.
//!
//! A typed façade used by every other component to persist tenant data:
//! service-status snapshots, SLA rollups, failover events. Every operation
//! takes a nest id and addresses data as `nest:<nestId>:<dataType>:<key>`
//! (see [`isolation`]); the adapter refuses to return data whose isolation
//! key or tenant-bound encryption envelope doesn't match the caller's nest.
//!
//! # Features
//!
//! - **Write-through / read-through cache**: an in-process LRU with
//!   per-`dataType` TTL in front of the backend
//! - **Tenant-bound envelopes**: AES-256-GCM with an HKDF-derived per-nest
//!   key and the nest id as authenticated data (see [`envelope`])
//! - **Single-writer-per-key**: concurrent writes to the same isolation key
//!   are serialized (see [`keylock`]); reads never block on a write
//! - **Degrades to cache-only** when the backend is unavailable; unsynced
//!   writes drain on the next [`StorageAdapter::sync`]
//! - **Lifecycle events**: `initialized`, `data-stored`, `data-deleted`,
//!   `sync-completed`

mod analytics;
mod backend;
mod config;
mod envelope;
mod error;
mod eviction;
mod events;
mod isolation;
mod keylock;
mod store;

pub use analytics::{record_sla_event, SLA_DATA_TYPE};
pub use backend::{BackendError, ContentAddressedBackend, InMemoryBackend};
pub use config::{StorageConfig, StorageConfigBuilder};
pub use error::StorageError;
pub use eviction::EvictionPolicy;
pub use events::StorageEvent;
pub use isolation::IsolationKey;

use futures::future::join_all;
use nestwatch_core::events::{EventListener, EventListeners};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use store::CacheStore;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

#[derive(Clone)]
struct StoredRecord {
    envelope: envelope::Envelope,
}

/// One `store`/`batchStore` operation.
pub struct StoreOp<'a> {
    pub nest_id: &'a str,
    pub data_type: &'a str,
    pub key: Option<&'a str>,
    pub payload: Vec<u8>,
}

/// Outcome of [`StorageAdapter::sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub failed: usize,
}

pub struct StorageAdapter<B: ContentAddressedBackend> {
    backend: B,
    config: Arc<StorageConfig>,
    cache: Mutex<CacheStore<String, StoredRecord>>,
    backend_index: Mutex<HashMap<String, String>>,
    unsynced: Mutex<HashSet<String>>,
    locks: keylock::KeyLocks,
    event_listeners: EventListeners<StorageEvent>,
}

impl<B: ContentAddressedBackend> StorageAdapter<B> {
    pub fn new(backend: B, config: StorageConfig) -> Self {
        let config = Arc::new(config);
        let adapter = Self {
            backend,
            cache: Mutex::new(CacheStore::new(config.cache_capacity, config.cache_eviction_policy)),
            backend_index: Mutex::new(HashMap::new()),
            unsynced: Mutex::new(HashSet::new()),
            locks: keylock::KeyLocks::new(),
            event_listeners: EventListeners::new(),
            config,
        };
        adapter.event_listeners.emit(&StorageEvent::Initialized {
            timestamp: Instant::now(),
        });
        adapter
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: EventListener<StorageEvent> + 'static,
    {
        self.event_listeners.add(listener);
    }

    /// Seals `payload` under a tenant-bound envelope, writes it through the
    /// cache, and enqueues a backend write. Returns the backend content id
    /// when the backend accepted the write, or `None` when it only landed
    /// in cache (backend unavailable; drained by [`Self::sync`] later).
    pub async fn store(
        &self,
        nest_id: &str,
        data_type: &str,
        payload: &[u8],
        key: Option<&str>,
    ) -> Result<Option<String>, StorageError> {
        let isolation_key = IsolationKey::new(nest_id, data_type, key)?;
        let raw = isolation_key.as_string();

        self.locks
            .with_lock(&raw, || self.store_locked(&isolation_key, &raw, payload, data_type))
            .await
    }

    async fn store_locked(
        &self,
        isolation_key: &IsolationKey,
        raw: &str,
        payload: &[u8],
        data_type: &str,
    ) -> Result<Option<String>, StorageError> {
        let sealed = envelope::seal(
            &self.config.master_key,
            &isolation_key.nest_id,
            payload,
            self.config.compression_threshold,
        )?;

        self.write_to_cache(raw, &sealed, data_type);

        let wire = bincode_envelope(&sealed);
        match self.backend.put(wire).await {
            Ok(backend_id) => {
                self.backend_index
                    .lock()
                    .unwrap()
                    .insert(raw.to_string(), backend_id.clone());
                self.unsynced.lock().unwrap().remove(raw);
                self.emit_stored(raw, false);
                Ok(Some(backend_id))
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                warn!(isolation_key = raw, error = %err, "backend write failed, keeping cache-only");
                self.unsynced.lock().unwrap().insert(raw.to_string());
                self.emit_stored(raw, true);
                Ok(None)
            }
        }
    }

    fn write_to_cache(&self, raw: &str, sealed: &envelope::Envelope, data_type: &str) {
        let ttl = self.config.ttl_for(data_type);
        self.cache.lock().unwrap().insert(
            raw.to_string(),
            StoredRecord {
                envelope: sealed.clone(),
            },
            ttl,
        );
    }

    fn emit_stored(&self, raw: &str, cached_only: bool) {
        self.event_listeners.emit(&StorageEvent::DataStored {
            timestamp: Instant::now(),
            isolation_key: raw.to_string(),
            cached_only,
        });
    }

    /// Reads through the cache, falling back to the backend on a miss using
    /// the last known content id. Rejects (via a failed decrypt) any payload
    /// whose envelope wasn't sealed for `nest_id`.
    pub async fn retrieve(
        &self,
        nest_id: &str,
        data_type: &str,
        key: Option<&str>,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        let isolation_key = IsolationKey::new(nest_id, data_type, key)?;
        let raw = isolation_key.as_string();

        if let Some(record) = self.cache.lock().unwrap().get(&raw) {
            return envelope::open(&self.config.master_key, nest_id, &record.envelope).map(Some);
        }

        let backend_id = self.backend_index.lock().unwrap().get(&raw).cloned();
        let Some(backend_id) = backend_id else {
            return Ok(None);
        };

        let Some(wire) = self.backend.get(&backend_id).await? else {
            return Ok(None);
        };
        let sealed = unbincode_envelope(&wire)?;
        let plaintext = envelope::open(&self.config.master_key, nest_id, &sealed)?;

        self.write_to_cache(&raw, &sealed, data_type);

        Ok(Some(plaintext))
    }

    /// Chunks `ops` into batches of the configured `batch_size`, running each
    /// batch concurrently with settle semantics (one failing op doesn't
    /// cancel its siblings), with a short pause between batches.
    pub async fn batch_store(&self, ops: Vec<StoreOp<'_>>) -> Vec<Result<Option<String>, StorageError>> {
        let mut results = Vec::with_capacity(ops.len());
        for chunk in ops.chunks(self.config.batch_size) {
            let futures = chunk
                .iter()
                .map(|op| self.store(op.nest_id, op.data_type, &op.payload, op.key));
            results.extend(join_all(futures).await);
            if results.len() < ops.len() {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        }
        results
    }

    /// Pattern query `nestId:dataType:*` over the cache only, per the
    /// adapter's contract — this does not reach into the backend.
    pub fn get_by_type(&self, nest_id: &str, data_type: &str) -> Result<Vec<Vec<u8>>, StorageError> {
        let prefix = IsolationKey::type_prefix(nest_id, data_type);
        let mut cache = self.cache.lock().unwrap();
        let keys = cache.keys_with_prefix(&prefix);

        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(record) = cache.get(&key) {
                out.push(envelope::open(&self.config.master_key, nest_id, &record.envelope)?);
            }
        }
        Ok(out)
    }

    /// Deletes a key from both the cache and, if a backend id is known, the
    /// backend.
    pub async fn delete(&self, nest_id: &str, data_type: &str, key: Option<&str>) -> Result<(), StorageError> {
        let isolation_key = IsolationKey::new(nest_id, data_type, key)?;
        let raw = isolation_key.as_string();

        self.cache.lock().unwrap().remove(&raw);
        self.unsynced.lock().unwrap().remove(&raw);

        if let Some(backend_id) = self.backend_index.lock().unwrap().remove(&raw) {
            self.backend.delete(&backend_id).await?;
        }

        self.event_listeners.emit(&StorageEvent::DataDeleted {
            timestamp: Instant::now(),
            isolation_key: raw,
        });
        Ok(())
    }

    /// Flushes cache entries whose last backend write failed. Entries whose
    /// cache record has since been evicted are dropped from the unsynced set
    /// without retrying — there is nothing left to flush.
    pub async fn sync(&self) -> SyncReport {
        let pending: Vec<String> = self.unsynced.lock().unwrap().iter().cloned().collect();
        let mut synced = 0;
        let mut failed = 0;

        for raw in pending {
            let record = self.cache.lock().unwrap().get(&raw);
            let Some(record) = record else {
                self.unsynced.lock().unwrap().remove(&raw);
                continue;
            };

            let wire = bincode_envelope(&record.envelope);
            match self.backend.put(wire).await {
                Ok(backend_id) => {
                    self.backend_index.lock().unwrap().insert(raw.clone(), backend_id);
                    self.unsynced.lock().unwrap().remove(&raw);
                    synced += 1;
                }
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    debug!(isolation_key = raw, "sync retry still failing");
                    failed += 1;
                }
            }
        }

        self.event_listeners.emit(&StorageEvent::SyncCompleted {
            timestamp: Instant::now(),
            synced,
            failed,
        });
        SyncReport { synced, failed }
    }
}

/// A small fixed-layout wire format for an envelope: `[compressed:u8][nonce:12][ciphertext...]`.
/// Avoids pulling in a general-purpose serializer for three fields.
fn bincode_envelope(envelope: &envelope::Envelope) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + 12 + envelope.ciphertext.len());
    out.push(envelope.compressed as u8);
    out.extend_from_slice(&envelope.nonce);
    out.extend_from_slice(&envelope.ciphertext);
    out
}

fn unbincode_envelope(wire: &[u8]) -> Result<envelope::Envelope, StorageError> {
    if wire.len() < 13 {
        return Err(StorageError::Codec("envelope wire format too short".to_string()));
    }
    let compressed = wire[0] != 0;
    let mut nonce = [0u8; 12];
    nonce.copy_from_slice(&wire[1..13]);
    Ok(envelope::Envelope {
        nonce,
        ciphertext: wire[13..].to_vec(),
        compressed,
    })
}
