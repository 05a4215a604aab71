//! Batch flusher: drains the buffer and bulk-persists its entries.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use reqtrack_core::result::AppResult;
use reqtrack_core::traits::{LogBuffer, LogStore};
use reqtrack_core::types::envelope::LogEnvelope;

/// Outcome of one flush cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The buffer held nothing; no store round-trip happened.
    Empty,
    /// A batch was persisted.
    Completed {
        /// Records written to the store.
        logs_processed: u64,
        /// New IP registry rows created for this batch.
        ips_created: u64,
        /// Entries dropped because they failed decoding.
        skipped: u64,
    },
}

/// Moves buffered entries into the durable store in batches.
///
/// One flush cycle is: atomically drain the buffer, decode the entries,
/// resolve every distinct registry IP in two bulk round-trips, then
/// bulk-insert the records. A malformed entry is logged and dropped; it
/// never blocks the rest of the batch.
#[derive(Debug, Clone)]
pub struct BufferFlusher {
    buffer: Arc<dyn LogBuffer>,
    store: Arc<dyn LogStore>,
}

impl BufferFlusher {
    pub fn new(buffer: Arc<dyn LogBuffer>, store: Arc<dyn LogStore>) -> Self {
        Self { buffer, store }
    }

    /// Run one flush cycle, draining at most `max_items` entries (the
    /// whole buffer when `None`).
    pub async fn flush(&self, max_items: Option<u64>) -> AppResult<FlushOutcome> {
        let raw = self.buffer.drain(max_items).await?;
        if raw.is_empty() {
            return Ok(FlushOutcome::Empty);
        }

        let mut envelopes = Vec::with_capacity(raw.len());
        let mut skipped = 0u64;
        for bytes in &raw {
            match LogEnvelope::decode(bytes) {
                Ok(envelope) => envelopes.push(envelope),
                Err(e) => {
                    skipped += 1;
                    warn!(error = %e, "Dropping undecodable buffer entry");
                }
            }
        }

        if envelopes.is_empty() {
            warn!(skipped, "Flush batch contained no decodable entries");
            return Ok(FlushOutcome::Completed {
                logs_processed: 0,
                ips_created: 0,
                skipped,
            });
        }

        let (ip_map, ips_created) = self.resolve_registry_ips(&envelopes).await?;

        let records = envelopes
            .into_iter()
            .map(|envelope| {
                let ip_id = envelope
                    .ip
                    .registry_ip()
                    .and_then(|ip| ip_map.get(ip).copied());
                envelope.into_record(ip_id)
            })
            .collect();

        let logs_processed = self.store.insert_logs(records).await?;
        info!(logs_processed, ips_created, skipped, "Flushed buffered log entries");

        Ok(FlushOutcome::Completed {
            logs_processed,
            ips_created,
            skipped,
        })
    }

    /// Resolve every distinct registry-destined IP in the batch to its
    /// registry id, creating missing rows in bulk.
    ///
    /// The second lookup after the conflict-tolerant create is what makes
    /// this safe against concurrent flushers: rows another writer created
    /// in the gap are picked up instead of lost.
    async fn resolve_registry_ips(
        &self,
        envelopes: &[LogEnvelope],
    ) -> AppResult<(HashMap<String, Uuid>, u64)> {
        let distinct: HashSet<&str> = envelopes
            .iter()
            .filter_map(|envelope| envelope.ip.registry_ip())
            .collect();
        if distinct.is_empty() {
            return Ok((HashMap::new(), 0));
        }
        let ips: Vec<String> = distinct.into_iter().map(String::from).collect();

        let known = self.store.ip_ids(&ips).await?;
        let missing: Vec<String> = ips
            .iter()
            .filter(|ip| !known.contains_key(ip.as_str()))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok((known, 0));
        }

        let ips_created = self.store.create_ips(&missing).await?;
        let resolved = self.store.ip_ids(&ips).await?;
        Ok((resolved, ips_created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use reqtrack_buffer::MemoryLogBuffer;
    use reqtrack_core::traits::LogBuffer;
    use reqtrack_core::types::record::IpSlot;
    use reqtrack_database::MemoryLogStore;

    fn envelope(route: &str, ip: IpSlot) -> LogEnvelope {
        LogEnvelope {
            ip,
            user_id: None,
            user_agent: "curl/8.0".to_string(),
            route: route.to_string(),
            method: "GET".to_string(),
            query_params: String::new(),
            status_code: 200,
            requested_at: Utc::now(),
            app_name: None,
            headers: None,
        }
    }

    async fn seed(buffer: &MemoryLogBuffer, envelopes: &[LogEnvelope]) {
        for e in envelopes {
            buffer.add(e.encode().unwrap()).await.unwrap();
        }
    }

    fn flusher(
        buffer: &Arc<MemoryLogBuffer>,
        store: &Arc<MemoryLogStore>,
    ) -> BufferFlusher {
        BufferFlusher::new(
            Arc::clone(buffer) as Arc<dyn LogBuffer>,
            Arc::clone(store) as Arc<dyn LogStore>,
        )
    }

    #[tokio::test]
    async fn empty_buffer_flushes_to_empty_outcome() {
        let buffer = Arc::new(MemoryLogBuffer::new());
        let store = Arc::new(MemoryLogStore::new());
        let outcome = flusher(&buffer, &store).flush(None).await.unwrap();
        assert_eq!(outcome, FlushOutcome::Empty);
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn batch_is_persisted_with_shared_registry_rows() {
        // Three entries from two distinct IPs end up as three records
        // referencing two registry rows.
        let buffer = Arc::new(MemoryLogBuffer::new());
        let store = Arc::new(MemoryLogStore::new());
        seed(
            &buffer,
            &[
                envelope("/a", IpSlot::Registry("10.0.0.1".to_string())),
                envelope("/b", IpSlot::Registry("10.0.0.1".to_string())),
                envelope("/c", IpSlot::Registry("10.0.0.2".to_string())),
            ],
        )
        .await;

        let outcome = flusher(&buffer, &store).flush(None).await.unwrap();
        assert_eq!(
            outcome,
            FlushOutcome::Completed {
                logs_processed: 3,
                ips_created: 2,
                skipped: 0,
            }
        );

        assert_eq!(store.ip_count(), 2);
        let records = store.records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.ip_id.is_some()));
        let distinct_ids: HashSet<_> = records.iter().map(|r| r.ip_id).collect();
        assert_eq!(distinct_ids.len(), 2);
        assert_eq!(buffer.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn known_ips_create_no_new_rows() {
        let buffer = Arc::new(MemoryLogBuffer::new());
        let store = Arc::new(MemoryLogStore::new());
        let existing = store.resolve_or_create_ip("10.0.0.1").await.unwrap();
        seed(
            &buffer,
            &[envelope("/a", IpSlot::Registry("10.0.0.1".to_string()))],
        )
        .await;

        let outcome = flusher(&buffer, &store).flush(None).await.unwrap();
        assert_eq!(
            outcome,
            FlushOutcome::Completed {
                logs_processed: 1,
                ips_created: 0,
                skipped: 0,
            }
        );
        assert_eq!(store.records()[0].ip_id, Some(existing));
    }

    #[tokio::test]
    async fn malformed_entries_are_skipped_not_fatal() {
        let buffer = Arc::new(MemoryLogBuffer::new());
        let store = Arc::new(MemoryLogStore::new());
        seed(
            &buffer,
            &[envelope("/a", IpSlot::Registry("10.0.0.1".to_string()))],
        )
        .await;
        buffer.add(vec![0xFF, 0x00, 0x01]).await.unwrap();

        let outcome = flusher(&buffer, &store).flush(None).await.unwrap();
        assert_eq!(
            outcome,
            FlushOutcome::Completed {
                logs_processed: 1,
                ips_created: 1,
                skipped: 1,
            }
        );
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn inline_and_unknown_slots_bypass_the_registry() {
        let buffer = Arc::new(MemoryLogBuffer::new());
        let store = Arc::new(MemoryLogStore::new());
        seed(
            &buffer,
            &[
                envelope("/a", IpSlot::Inline("10.0.0.9".to_string())),
                envelope("/b", IpSlot::Unknown),
            ],
        )
        .await;

        let outcome = flusher(&buffer, &store).flush(None).await.unwrap();
        assert_eq!(
            outcome,
            FlushOutcome::Completed {
                logs_processed: 2,
                ips_created: 0,
                skipped: 0,
            }
        );
        assert_eq!(store.ip_count(), 0);
        let records = store.records();
        assert!(records.iter().all(|r| r.ip_id.is_none()));
    }

    #[tokio::test]
    async fn bounded_flush_leaves_the_remainder_buffered() {
        let buffer = Arc::new(MemoryLogBuffer::new());
        let store = Arc::new(MemoryLogStore::new());
        let entries: Vec<LogEnvelope> = (0..5)
            .map(|i| envelope(&format!("/r{i}"), IpSlot::Unknown))
            .collect();
        seed(&buffer, &entries).await;

        let outcome = flusher(&buffer, &store).flush(Some(3)).await.unwrap();
        assert_eq!(
            outcome,
            FlushOutcome::Completed {
                logs_processed: 3,
                ips_created: 0,
                skipped: 0,
            }
        );
        assert_eq!(buffer.len().await.unwrap(), 2);
    }
}
