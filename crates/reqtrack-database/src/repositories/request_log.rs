//! Request log repository implementation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use reqtrack_core::error::{AppError, ErrorKind};
use reqtrack_core::result::AppResult;
use reqtrack_core::types::pagination::{PageRequest, PageResponse};
use reqtrack_core::types::record::NewRequestLog;
use reqtrack_entity::request_log::{RequestLogWithIp, StatusBand};

/// Columns selected for the read-side projection, with the registry IP
/// joined in.
const SELECT_WITH_IP: &str = "SELECT rl.id, ia.ip AS ip, rl.ip_address, rl.user_id, \
     rl.user_agent, rl.route, rl.method, rl.query_params, rl.status_code, \
     rl.requested_at, rl.app_name, rl.headers \
     FROM request_log rl LEFT JOIN ip_address ia ON ia.id = rl.ip_id";

/// Filters for browsing the request log.
#[derive(Debug, Clone, Default)]
pub struct LogSearchFilter {
    /// Exact HTTP method match.
    pub method: Option<String>,
    /// Status code band (2xx/3xx/4xx/5xx).
    pub band: Option<StatusBand>,
    /// Route prefix match.
    pub route_prefix: Option<String>,
    /// Exact principal match.
    pub user_id: Option<Uuid>,
}

/// Repository for request log entries.
#[derive(Debug, Clone)]
pub struct RequestLogRepository {
    pool: PgPool,
}

impl RequestLogRepository {
    /// Create a new request log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a single log record (direct-mode delivery).
    pub async fn insert(&self, record: &NewRequestLog) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO request_log (ip_id, ip_address, user_id, user_agent, route, \
             method, query_params, status_code, requested_at, app_name, headers) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(record.ip_id)
        .bind(&record.ip_address)
        .bind(record.user_id)
        .bind(&record.user_agent)
        .bind(&record.route)
        .bind(&record.method)
        .bind(&record.query_params)
        .bind(record.status_code)
        .bind(record.requested_at)
        .bind(&record.app_name)
        .bind(headers_to_json(record.headers.as_ref()))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert log entry", e))?;
        Ok(())
    }

    /// Bulk-insert log records in one statement (flush-time delivery).
    pub async fn bulk_insert(&self, records: &[NewRequestLog]) -> AppResult<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO request_log (ip_id, ip_address, user_id, user_agent, route, \
             method, query_params, status_code, requested_at, app_name, headers) ",
        );
        builder.push_values(records, |mut row, record| {
            row.push_bind(record.ip_id)
                .push_bind(&record.ip_address)
                .push_bind(record.user_id)
                .push_bind(&record.user_agent)
                .push_bind(&record.route)
                .push_bind(&record.method)
                .push_bind(&record.query_params)
                .push_bind(record.status_code)
                .push_bind(record.requested_at)
                .push_bind(&record.app_name)
                .push_bind(headers_to_json(record.headers.as_ref()));
        });

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to bulk-insert log entries", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Browse the log with filters, most recent first.
    pub async fn search(
        &self,
        filter: &LogSearchFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<RequestLogWithIp>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if filter.method.is_some() {
            conditions.push(format!("rl.method = ${param_idx}"));
            param_idx += 1;
        }
        if filter.band.is_some() {
            conditions.push(format!(
                "rl.status_code >= ${param_idx} AND rl.status_code < ${}",
                param_idx + 1
            ));
            param_idx += 2;
        }
        if filter.route_prefix.is_some() {
            conditions.push(format!("rl.route LIKE ${param_idx}"));
            param_idx += 1;
        }
        if filter.user_id.is_some() {
            conditions.push(format!("rl.user_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM request_log rl {where_clause}");
        let select_sql = format!(
            "{SELECT_WITH_IP} {where_clause} ORDER BY rl.requested_at DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, RequestLogWithIp>(&select_sql);

        if let Some(method) = &filter.method {
            count_query = count_query.bind(method.clone());
            select_query = select_query.bind(method.clone());
        }
        if let Some(band) = filter.band {
            let (lo, hi) = band.range();
            count_query = count_query.bind(lo).bind(hi);
            select_query = select_query.bind(lo).bind(hi);
        }
        if let Some(prefix) = &filter.route_prefix {
            let pattern = format!("{}%", prefix.replace('%', "\\%").replace('_', "\\_"));
            count_query = count_query.bind(pattern.clone());
            select_query = select_query.bind(pattern);
        }
        if let Some(user_id) = filter.user_id {
            count_query = count_query.bind(user_id);
            select_query = select_query.bind(user_id);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count log entries", e)
        })?;

        let entries = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search log entries", e)
            })?;

        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Delete entries captured before `cutoff`. Returns the number deleted.
    pub async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM request_log WHERE requested_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete old log entries", e)
            })?;
        Ok(result.rows_affected())
    }

    /// Keep only the `count` most recent entries. Returns the number deleted.
    pub async fn keep_most_recent(&self, count: i64) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM request_log WHERE id NOT IN \
             (SELECT id FROM request_log ORDER BY requested_at DESC LIMIT $1)",
        )
        .bind(count)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to trim log entries", e)
        })?;
        Ok(result.rows_affected())
    }
}

/// Convert captured headers into a JSONB value. String-to-string maps
/// always convert, so this stays infallible.
fn headers_to_json(headers: Option<&BTreeMap<String, String>>) -> Option<serde_json::Value> {
    headers.map(|map| {
        serde_json::Value::Object(
            map.iter()
                .map(|(name, value)| (name.clone(), serde_json::Value::String(value.clone())))
                .collect(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_convert_to_json_object() {
        let mut headers = BTreeMap::new();
        headers.insert("x-request-id".to_string(), "abc".to_string());
        let value = headers_to_json(Some(&headers)).unwrap();
        assert_eq!(value["x-request-id"], "abc");
        assert!(headers_to_json(None).is_none());
    }
}
