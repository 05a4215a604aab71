//! Durable store trait for log records and the IP registry.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;
use crate::types::record::NewRequestLog;

/// Trait over the durable store reached by the direct sink and the batch
/// flusher.
///
/// Concrete implementations live in `reqtrack-database` (PostgreSQL); an
/// in-memory implementation backs the recorder and flusher tests.
#[async_trait]
pub trait LogStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the registry id for `ip`, creating the row if it does not
    /// exist. Idempotent and safe under concurrent first-sighting.
    async fn resolve_or_create_ip(&self, ip: &str) -> AppResult<Uuid>;

    /// Map the given IP strings to their registry ids. IPs without a
    /// registry row are absent from the result.
    async fn ip_ids(&self, ips: &[String]) -> AppResult<HashMap<String, Uuid>>;

    /// Bulk-create registry rows for the given IPs, silently absorbing
    /// conflicts with concurrent creators. Returns the number of rows
    /// actually inserted.
    async fn create_ips(&self, ips: &[String]) -> AppResult<u64>;

    /// Persist a single log record.
    async fn insert_log(&self, record: NewRequestLog) -> AppResult<()>;

    /// Bulk-persist log records in one batch operation. Returns the number
    /// of rows inserted.
    async fn insert_logs(&self, records: Vec<NewRequestLog>) -> AppResult<u64>;
}
