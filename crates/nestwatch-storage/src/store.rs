//! Write-through cache storage backing the tenant storage adapter.
//!
//! TTL is per-entry (not per-store) since each `dataType` configures its own
//! retention, from hours for live status to a year for SLA records.

use crate::eviction::{EvictionPolicy, EvictionStore, FifoStore, LfuStore, LruStore};
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Option<Duration>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self) -> bool {
        match self.ttl {
            Some(ttl) => self.inserted_at.elapsed() > ttl,
            None => false,
        }
    }
}

/// Cache store with configurable eviction policy and per-entry TTL.
pub(crate) struct CacheStore<K, V> {
    store: Box<dyn EvictionStore<K, CacheEntry<V>>>,
}

impl<K: Hash + Eq + Clone + Send + 'static, V: Clone + Send + 'static> CacheStore<K, V> {
    pub(crate) fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        let store: Box<dyn EvictionStore<K, CacheEntry<V>>> = match policy {
            EvictionPolicy::Lru => Box::new(LruStore::new(capacity)),
            EvictionPolicy::Lfu => Box::new(LfuStore::new(capacity)),
            EvictionPolicy::Fifo => Box::new(FifoStore::new(capacity)),
        };

        Self { store }
    }

    /// Gets a value from the cache if it exists and is not expired.
    pub(crate) fn get(&mut self, key: &K) -> Option<V> {
        let entry = self.store.get(key)?;

        if entry.is_expired() {
            self.store.remove(key);
            None
        } else {
            Some(entry.value.clone())
        }
    }

    /// Inserts a value with the given TTL. Returns the evicted entry, if any.
    pub(crate) fn insert(&mut self, key: K, value: V, ttl: Option<Duration>) -> Option<V> {
        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
            ttl,
        };
        self.store.insert(key, entry).map(|(_, e)| e.value)
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        self.store.remove(key).map(|e| e.value)
    }

    pub(crate) fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns every live key whose string form starts with `prefix`, used to
    /// answer `getByType` pattern queries.
    pub(crate) fn keys_with_prefix(&self, prefix: &str) -> Vec<K>
    where
        K: AsRef<str>,
    {
        self.store
            .keys()
            .into_iter()
            .filter(|k| k.as_ref().starts_with(prefix))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_cache_store_basic() {
        let mut store: CacheStore<String, &str> = CacheStore::new(2, EvictionPolicy::Lru);

        store.insert("key1".into(), "value1", None);
        assert_eq!(store.get(&"key1".to_string()), Some("value1"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&"key2".to_string()), None);
    }

    #[test]
    fn test_cache_store_lru_eviction() {
        let mut store: CacheStore<String, &str> = CacheStore::new(2, EvictionPolicy::Lru);

        store.insert("key1".into(), "value1", None);
        store.insert("key2".into(), "value2", None);
        let evicted = store.insert("key3".into(), "value3", None);
        assert_eq!(evicted, Some("value1"));

        assert_eq!(store.get(&"key1".to_string()), None);
        assert_eq!(store.get(&"key2".to_string()), Some("value2"));
        assert_eq!(store.get(&"key3".to_string()), Some("value3"));
    }

    #[test]
    fn test_cache_store_per_entry_ttl() {
        let mut store: CacheStore<String, &str> = CacheStore::new(10, EvictionPolicy::Lru);

        store.insert("short".into(), "value1", Some(Duration::from_millis(50)));
        store.insert("long".into(), "value2", None);

        sleep(Duration::from_millis(60));

        assert_eq!(store.get(&"short".to_string()), None);
        assert_eq!(store.get(&"long".to_string()), Some("value2"));
    }

    #[test]
    fn test_keys_with_prefix() {
        let mut store: CacheStore<String, &str> = CacheStore::new(10, EvictionPolicy::Lru);
        store.insert("nest:a:status:1".into(), "up", None);
        store.insert("nest:a:status:2".into(), "down", None);
        store.insert("nest:a:sla:1".into(), "99.9", None);

        let mut keys = store.keys_with_prefix("nest:a:status:");
        keys.sort();
        assert_eq!(keys, vec!["nest:a:status:1".to_string(), "nest:a:status:2".to_string()]);
    }
}
