//! IP registry repository implementation.

use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use reqtrack_core::error::{AppError, ErrorKind};
use reqtrack_core::result::AppResult;
use reqtrack_entity::ip_address::IpAddress;

/// Repository for the normalized IP registry.
#[derive(Debug, Clone)]
pub struct IpAddressRepository {
    pool: PgPool,
}

impl IpAddressRepository {
    /// Create a new IP registry repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the registry id for `ip`, creating the row on first sighting.
    ///
    /// A single upsert statement, so two requests racing on a new IP both
    /// get the same id back instead of one hitting a uniqueness violation.
    pub async fn resolve_or_create(&self, ip: &str) -> AppResult<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO ip_address (ip) VALUES ($1) \
             ON CONFLICT (ip) DO UPDATE SET ip = EXCLUDED.ip \
             RETURNING id",
        )
        .bind(ip)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to resolve IP address", e))
    }

    /// Fetch the registry rows for the given IP strings. IPs without a
    /// row are simply absent from the result.
    pub async fn find_by_ips(&self, ips: &[String]) -> AppResult<Vec<IpAddress>> {
        if ips.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, IpAddress>("SELECT id, ip FROM ip_address WHERE ip = ANY($1)")
            .bind(ips)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to look up IP addresses", e)
            })
    }

    /// Bulk-insert registry rows, silently absorbing duplicates created by
    /// concurrent flushers or direct-mode writers. Returns the number of
    /// rows actually inserted.
    pub async fn create_missing(&self, ips: &[String]) -> AppResult<u64> {
        if ips.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new("INSERT INTO ip_address (ip) ");
        builder.push_values(ips, |mut row, ip| {
            row.push_bind(ip);
        });
        builder.push(" ON CONFLICT (ip) DO NOTHING");

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to bulk-create IP addresses", e)
        })?;
        Ok(result.rows_affected())
    }
}
