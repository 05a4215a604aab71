//! PostgreSQL implementation of the `LogStore` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use reqtrack_core::result::AppResult;
use reqtrack_core::traits::store::LogStore;
use reqtrack_core::types::record::NewRequestLog;

use crate::repositories::{IpAddressRepository, RequestLogRepository};

/// Durable store backed by PostgreSQL, composed from the IP registry and
/// request log repositories.
#[derive(Debug, Clone)]
pub struct PgLogStore {
    /// IP registry repository.
    ips: IpAddressRepository,
    /// Request log repository.
    logs: RequestLogRepository,
}

impl PgLogStore {
    /// Create a new store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            ips: IpAddressRepository::new(pool.clone()),
            logs: RequestLogRepository::new(pool),
        }
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn resolve_or_create_ip(&self, ip: &str) -> AppResult<Uuid> {
        self.ips.resolve_or_create(ip).await
    }

    async fn ip_ids(&self, ips: &[String]) -> AppResult<HashMap<String, Uuid>> {
        let rows = self.ips.find_by_ips(ips).await?;
        Ok(rows.into_iter().map(|row| (row.ip, row.id)).collect())
    }

    async fn create_ips(&self, ips: &[String]) -> AppResult<u64> {
        self.ips.create_missing(ips).await
    }

    async fn insert_log(&self, record: NewRequestLog) -> AppResult<()> {
        self.logs.insert(&record).await
    }

    async fn insert_logs(&self, records: Vec<NewRequestLog>) -> AppResult<u64> {
        self.logs.bulk_insert(&records).await
    }
}
