use crate::eviction::EvictionPolicy;
use std::collections::HashMap;
use std::time::Duration;

/// Default retention when a `dataType` has no explicit TTL entry.
const DEFAULT_TTL: Duration = Duration::from_secs(3600);

pub struct StorageConfig {
    pub(crate) master_key: Vec<u8>,
    pub(crate) ttl_by_data_type: HashMap<String, Duration>,
    pub(crate) default_ttl: Option<Duration>,
    pub(crate) compression_threshold: usize,
    pub(crate) cache_capacity: usize,
    pub(crate) cache_eviction_policy: EvictionPolicy,
    pub(crate) batch_size: usize,
}

impl StorageConfig {
    pub fn builder(master_key: impl Into<Vec<u8>>) -> StorageConfigBuilder {
        StorageConfigBuilder::new(master_key)
    }

    pub(crate) fn ttl_for(&self, data_type: &str) -> Option<Duration> {
        self.ttl_by_data_type
            .get(data_type)
            .copied()
            .or(self.default_ttl)
    }
}

pub struct StorageConfigBuilder {
    master_key: Vec<u8>,
    ttl_by_data_type: HashMap<String, Duration>,
    default_ttl: Option<Duration>,
    compression_threshold: usize,
    cache_capacity: usize,
    cache_eviction_policy: EvictionPolicy,
    batch_size: usize,
}

impl StorageConfigBuilder {
    pub fn new(master_key: impl Into<Vec<u8>>) -> Self {
        Self {
            master_key: master_key.into(),
            ttl_by_data_type: HashMap::new(),
            default_ttl: Some(DEFAULT_TTL),
            compression_threshold: crate::envelope::DEFAULT_COMPRESSION_THRESHOLD,
            cache_capacity: 10_000,
            cache_eviction_policy: EvictionPolicy::Lru,
            batch_size: 50,
        }
    }

    /// Sets the retention for a specific `dataType`, e.g. short-lived
    /// `SERVICE_STATUS` rows vs. year-long `SLA` rollups.
    pub fn ttl_for(mut self, data_type: impl Into<String>, ttl: Duration) -> Self {
        self.ttl_by_data_type.insert(data_type.into(), ttl);
        self
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// No TTL at all — entries never expire from cache.
    pub fn no_default_ttl(mut self) -> Self {
        self.default_ttl = None;
        self
    }

    pub fn compression_threshold(mut self, bytes: usize) -> Self {
        self.compression_threshold = bytes;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn cache_eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.cache_eviction_policy = policy;
        self
    }

    /// Max concurrent writes within a single `batchStore` call.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn build(self) -> StorageConfig {
        StorageConfig {
            master_key: self.master_key,
            ttl_by_data_type: self.ttl_by_data_type,
            default_ttl: self.default_ttl,
            compression_threshold: self.compression_threshold,
            cache_capacity: self.cache_capacity,
            cache_eviction_policy: self.cache_eviction_policy,
            batch_size: self.batch_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_type_ttl_overrides_default() {
        let config = StorageConfig::builder(b"key".to_vec())
            .default_ttl(Duration::from_secs(60))
            .ttl_for("SLA", Duration::from_secs(31_536_000))
            .build();

        assert_eq!(config.ttl_for("SLA"), Some(Duration::from_secs(31_536_000)));
        assert_eq!(config.ttl_for("SERVICE_STATUS"), Some(Duration::from_secs(60)));
    }

    #[test]
    fn no_default_ttl_means_entries_never_expire() {
        let config = StorageConfig::builder(b"key".to_vec()).no_default_ttl().build();
        assert_eq!(config.ttl_for("anything"), None);
    }
}
