//! Redis-backed log entry buffer.

use ::redis::AsyncCommands;
use async_trait::async_trait;
use tracing::debug;

use reqtrack_core::error::{AppError, ErrorKind};
use reqtrack_core::result::AppResult;
use reqtrack_core::traits::buffer::LogBuffer;

use super::client::RedisClient;

/// Redis set buffer holding serialized log envelopes.
///
/// Entries are added with `SADD` (deduplicating on exact byte content)
/// and drained either with `SPOP <count>` (bounded) or an atomic
/// `SMEMBERS` + `DEL` transaction (unbounded). Both drain forms are
/// single atomic operations, so concurrent flushers neither lose nor
/// double-count entries.
#[derive(Debug, Clone)]
pub struct RedisLogBuffer {
    /// Redis client.
    client: RedisClient,
    /// The set key holding buffered entries.
    key: String,
}

impl RedisLogBuffer {
    /// Create a new Redis buffer over the configured set key.
    pub fn new(client: RedisClient, key: impl Into<String>) -> Self {
        Self {
            client,
            key: key.into(),
        }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: ::redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Buffer, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl LogBuffer for RedisLogBuffer {
    async fn add(&self, entry: Vec<u8>) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: () = conn.sadd(&self.key, entry).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn drain(&self, max_items: Option<u64>) -> AppResult<Vec<Vec<u8>>> {
        let mut conn = self.client.conn_mut();

        let entries: Vec<Vec<u8>> = match max_items {
            Some(count) => {
                // SPOP with a count removes and returns members atomically.
                ::redis::cmd("SPOP")
                    .arg(&self.key)
                    .arg(count)
                    .query_async(&mut conn)
                    .await
                    .map_err(Self::map_err)?
            }
            None => {
                // Read-and-clear in one MULTI/EXEC transaction.
                let (entries, _deleted): (Vec<Vec<u8>>, u64) = ::redis::pipe()
                    .atomic()
                    .smembers(&self.key)
                    .del(&self.key)
                    .query_async(&mut conn)
                    .await
                    .map_err(Self::map_err)?;
                entries
            }
        };

        debug!(key = %self.key, count = entries.len(), "Drained buffer entries");
        Ok(entries)
    }

    async fn len(&self) -> AppResult<u64> {
        let mut conn = self.client.conn_mut();
        let count: u64 = conn.scard(&self.key).await.map_err(Self::map_err)?;
        Ok(count)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = ::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
