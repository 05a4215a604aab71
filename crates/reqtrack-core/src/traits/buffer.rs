//! Buffer trait for the shared not-yet-persisted entry set.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for the shared deduplicating entry buffer (Redis or in-memory).
///
/// The buffer holds serialized log envelopes keyed by exact byte content:
/// byte-identical entries collapse to one. No ordering is guaranteed —
/// consumers must not assume entries drain in arrival order.
#[async_trait]
pub trait LogBuffer: Send + Sync + std::fmt::Debug + 'static {
    /// Add a serialized entry to the buffer.
    async fn add(&self, entry: Vec<u8>) -> AppResult<()>;

    /// Atomically remove and return up to `max_items` entries, or the
    /// entire buffer contents when `max_items` is `None`.
    ///
    /// The drain must be a single atomic operation against the backing
    /// store so concurrent flushers neither lose nor double-count entries.
    async fn drain(&self, max_items: Option<u64>) -> AppResult<Vec<Vec<u8>>>;

    /// Number of entries currently buffered.
    async fn len(&self) -> AppResult<u64>;

    /// Check that the buffer backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
