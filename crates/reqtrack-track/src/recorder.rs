//! The recorder: policy gate, entry build, and delivery to one sink.

use std::sync::Arc;

use tracing::debug;

use reqtrack_core::config::tracking::TrackingConfig;
use reqtrack_core::result::AppResult;
use reqtrack_core::traits::{LogBuffer, LogStore};
use reqtrack_core::types::envelope::LogEnvelope;

use crate::entry::EntryBuilder;
use crate::policy::PolicyEngine;
use crate::request::{CapturedRequest, Principal};

/// Where accepted entries go. Chosen once at startup from configuration;
/// a deployment runs exactly one of the two paths.
#[derive(Debug, Clone)]
pub enum LogSink {
    /// Enqueue into the shared buffer for later batch flushing.
    Buffered(Arc<dyn LogBuffer>),
    /// Write straight to the durable store within the request lifecycle.
    Direct(Arc<dyn LogStore>),
}

/// Runs the full per-request pipeline: decide, build, deliver.
#[derive(Debug, Clone)]
pub struct RequestRecorder {
    policy: PolicyEngine,
    builder: EntryBuilder,
    sink: LogSink,
}

impl RequestRecorder {
    pub fn new(config: TrackingConfig, sink: LogSink) -> Self {
        Self {
            policy: PolicyEngine::new(config.clone()),
            builder: EntryBuilder::new(config),
            sink,
        }
    }

    /// Record one completed request if policy accepts it.
    ///
    /// Returns whether an entry was delivered. Delivery failures surface
    /// as errors; the caller decides whether they affect the response
    /// (the web layer logs and swallows them).
    pub async fn record(
        &self,
        request: &CapturedRequest,
        status_code: u16,
        principal: &Principal,
    ) -> AppResult<bool> {
        if !self.policy.should_log(&request.path, principal) {
            debug!(path = %request.path, "Request rejected by logging policy");
            return Ok(false);
        }

        let envelope = self.builder.build(request, status_code, principal);
        self.deliver(envelope).await?;
        Ok(true)
    }

    async fn deliver(&self, envelope: LogEnvelope) -> AppResult<()> {
        match &self.sink {
            LogSink::Buffered(buffer) => buffer.add(envelope.encode()?).await,
            LogSink::Direct(store) => {
                let ip_id = match envelope.ip.registry_ip() {
                    Some(ip) => Some(store.resolve_or_create_ip(ip).await?),
                    None => None,
                };
                store.insert_log(envelope.into_record(ip_id)).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use reqtrack_buffer::MemoryLogBuffer;
    use reqtrack_database::MemoryLogStore;

    fn captured(path: &str) -> CapturedRequest {
        CapturedRequest {
            method: "GET".to_string(),
            path: path.to_string(),
            remote_addr: Some("10.0.0.1".to_string()),
            ..CapturedRequest::default()
        }
    }

    fn config() -> TrackingConfig {
        TrackingConfig {
            app_name: Some("shop".to_string()),
            ..TrackingConfig::default()
        }
    }

    #[tokio::test]
    async fn accepted_request_lands_in_the_buffer() {
        // Buffered mode only enqueues; nothing reaches the store.
        let buffer = Arc::new(MemoryLogBuffer::new());
        let recorder = RequestRecorder::new(config(), LogSink::Buffered(buffer.clone()));

        let delivered = recorder
            .record(&captured("/things"), 200, &Principal::Anonymous)
            .await
            .unwrap();
        assert!(delivered);
        assert_eq!(buffer.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn rejected_request_touches_no_sink() {
        let buffer = Arc::new(MemoryLogBuffer::new());
        let recorder = RequestRecorder::new(
            TrackingConfig {
                exclude_paths: vec!["/admin".to_string()],
                ..config()
            },
            LogSink::Buffered(buffer.clone()),
        );

        let delivered = recorder
            .record(&captured("/admin/users"), 200, &Principal::Anonymous)
            .await
            .unwrap();
        assert!(!delivered);
        assert_eq!(buffer.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn direct_sink_resolves_the_ip_registry() {
        let store = Arc::new(MemoryLogStore::new());
        let recorder = RequestRecorder::new(config(), LogSink::Direct(store.clone()));

        recorder
            .record(&captured("/things"), 200, &Principal::Anonymous)
            .await
            .unwrap();
        recorder
            .record(&captured("/other"), 404, &Principal::Anonymous)
            .await
            .unwrap();

        // Same client IP resolves to one registry row shared by both rows.
        assert_eq!(store.ip_count(), 1);
        let records = store.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ip_id, records[1].ip_id);
        assert!(records[0].ip_id.is_some());
        assert_eq!(records[0].ip_address, None);
    }

    #[tokio::test]
    async fn direct_sink_stores_inline_ip_when_registry_is_disabled() {
        // Registry disabled: the inline IP lands on the row, no registry lookup.
        let store = Arc::new(MemoryLogStore::new());
        let recorder = RequestRecorder::new(
            TrackingConfig {
                use_ip_address_model: false,
                ..config()
            },
            LogSink::Direct(store.clone()),
        );

        recorder
            .record(&captured("/things"), 200, &Principal::Anonymous)
            .await
            .unwrap();

        assert_eq!(store.ip_count(), 0);
        let records = store.records();
        assert_eq!(records[0].ip_id, None);
        assert_eq!(records[0].ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[tokio::test]
    async fn each_record_populates_at_most_one_ip_field() {
        let store = Arc::new(MemoryLogStore::new());
        let recorder = RequestRecorder::new(config(), LogSink::Direct(store.clone()));

        let mut no_ip = captured("/things");
        no_ip.remote_addr = None;
        recorder
            .record(&no_ip, 200, &Principal::Anonymous)
            .await
            .unwrap();

        let records = store.records();
        assert_eq!(records[0].ip_id, None);
        assert_eq!(records[0].ip_address, None);
    }
}
