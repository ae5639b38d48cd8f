//! Thin convenience wrapper over [`crate::StorageAdapter`] for SLA/analytics
//! rollups. Has no independent behavior beyond a `store()` call with the
//! `dataType`/TTL defaults analytics records use — this crate's write
//! contract is the whole of the analytics surface.

use crate::backend::ContentAddressedBackend;
use crate::error::StorageError;
use crate::StorageAdapter;

pub const SLA_DATA_TYPE: &str = "MONITORING_DATA";

/// Writes one SLA/analytics rollup under the standard `MONITORING_DATA`
/// data type, keyed so successive rollups for the same service don't
/// collide: `{service_id}:{period_key}`.
pub async fn record_sla_event<B: ContentAddressedBackend>(
    adapter: &StorageAdapter<B>,
    nest_id: &str,
    service_id: &str,
    period_key: &str,
    payload: &[u8],
) -> Result<Option<String>, StorageError> {
    let key = format!("{service_id}:{period_key}");
    adapter.store(nest_id, SLA_DATA_TYPE, payload, Some(&key)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryBackend, StorageConfig};

    #[tokio::test]
    async fn record_sla_event_is_retrievable_under_its_key() {
        let adapter = StorageAdapter::new(InMemoryBackend::new(), StorageConfig::builder(b"0123456789abcdef0123456789abcdef".to_vec()).build());
        record_sla_event(&adapter, "acme", "svc-1", "2026-07", b"{\"uptime\":99.95}").await.unwrap();

        let got = adapter.retrieve("acme", SLA_DATA_TYPE, Some("svc-1:2026-07")).await.unwrap();
        assert_eq!(got, Some(b"{\"uptime\":99.95}".to_vec()));
    }
}
