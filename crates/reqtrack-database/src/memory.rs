//! In-memory [`LogStore`] used by tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use reqtrack_core::result::AppResult;
use reqtrack_core::traits::LogStore;
use reqtrack_core::types::record::NewRequestLog;

/// A [`LogStore`] over process-local maps. Mirrors the uniqueness
/// semantics of the PostgreSQL store: one registry row per IP string,
/// conflict-free re-creation.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    ips: Mutex<HashMap<String, Uuid>>,
    logs: Mutex<Vec<NewRequestLog>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every inserted record, in insertion order.
    pub fn records(&self) -> Vec<NewRequestLog> {
        self.logs.lock().unwrap().clone()
    }

    /// Number of registry rows.
    pub fn ip_count(&self) -> usize {
        self.ips.lock().unwrap().len()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn resolve_or_create_ip(&self, ip: &str) -> AppResult<Uuid> {
        let mut ips = self.ips.lock().unwrap();
        Ok(*ips.entry(ip.to_string()).or_insert_with(Uuid::new_v4))
    }

    async fn ip_ids(&self, ips: &[String]) -> AppResult<HashMap<String, Uuid>> {
        let known = self.ips.lock().unwrap();
        Ok(ips
            .iter()
            .filter_map(|ip| known.get(ip).map(|id| (ip.clone(), *id)))
            .collect())
    }

    async fn create_ips(&self, ips: &[String]) -> AppResult<u64> {
        let mut known = self.ips.lock().unwrap();
        let mut created = 0;
        for ip in ips {
            known.entry(ip.clone()).or_insert_with(|| {
                created += 1;
                Uuid::new_v4()
            });
        }
        Ok(created)
    }

    async fn insert_log(&self, record: NewRequestLog) -> AppResult<()> {
        self.logs.lock().unwrap().push(record);
        Ok(())
    }

    async fn insert_logs(&self, records: Vec<NewRequestLog>) -> AppResult<u64> {
        let inserted = records.len() as u64;
        self.logs.lock().unwrap().extend(records);
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_is_idempotent_per_ip() {
        let store = MemoryLogStore::new();
        let first = store.resolve_or_create_ip("10.0.0.1").await.unwrap();
        let second = store.resolve_or_create_ip("10.0.0.1").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.ip_count(), 1);
    }

    #[tokio::test]
    async fn create_ips_counts_only_new_rows() {
        let store = MemoryLogStore::new();
        store.resolve_or_create_ip("10.0.0.1").await.unwrap();
        let created = store
            .create_ips(&["10.0.0.1".to_string(), "10.0.0.2".to_string()])
            .await
            .unwrap();
        assert_eq!(created, 1);
        assert_eq!(store.ip_count(), 2);
    }

    #[tokio::test]
    async fn ip_ids_omits_unknown_ips() {
        let store = MemoryLogStore::new();
        let id = store.resolve_or_create_ip("10.0.0.1").await.unwrap();
        let map = store
            .ip_ids(&["10.0.0.1".to_string(), "10.0.0.9".to_string()])
            .await
            .unwrap();
        assert_eq!(map.get("10.0.0.1"), Some(&id));
        assert!(!map.contains_key("10.0.0.9"));
    }
}
