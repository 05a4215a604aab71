//! In-memory log entry buffer.
//!
//! Same deduplicating-set semantics as the Redis buffer, used by tests
//! and single-process development setups. A single mutex guard spans each
//! drain, which gives the same atomicity the Redis backend gets from
//! SPOP/MULTI.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use reqtrack_core::result::AppResult;
use reqtrack_core::traits::buffer::LogBuffer;

/// In-memory deduplicating entry buffer.
#[derive(Debug, Default)]
pub struct MemoryLogBuffer {
    /// Buffered entries, keyed by exact byte content.
    entries: Mutex<HashSet<Vec<u8>>>,
}

impl MemoryLogBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogBuffer for MemoryLogBuffer {
    async fn add(&self, entry: Vec<u8>) -> AppResult<()> {
        self.entries.lock().await.insert(entry);
        Ok(())
    }

    async fn drain(&self, max_items: Option<u64>) -> AppResult<Vec<Vec<u8>>> {
        let mut entries = self.entries.lock().await;
        let drained = match max_items {
            Some(count) => {
                let picked: Vec<Vec<u8>> = entries
                    .iter()
                    .take(count as usize)
                    .cloned()
                    .collect();
                for entry in &picked {
                    entries.remove(entry);
                }
                picked
            }
            None => std::mem::take(&mut *entries).into_iter().collect(),
        };
        Ok(drained)
    }

    async fn len(&self) -> AppResult<u64> {
        Ok(self.entries.lock().await.len() as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn add_deduplicates_identical_entries() {
        let buffer = MemoryLogBuffer::new();
        buffer.add(vec![1, 2, 3]).await.unwrap();
        buffer.add(vec![1, 2, 3]).await.unwrap();
        buffer.add(vec![4, 5]).await.unwrap();
        assert_eq!(buffer.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn bounded_drain_leaves_remainder() {
        let buffer = MemoryLogBuffer::new();
        for i in 0..5u8 {
            buffer.add(vec![i]).await.unwrap();
        }
        let drained = buffer.drain(Some(3)).await.unwrap();
        assert_eq!(drained.len(), 3);
        assert_eq!(buffer.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unbounded_drain_empties_buffer() {
        let buffer = MemoryLogBuffer::new();
        for i in 0..5u8 {
            buffer.add(vec![i]).await.unwrap();
        }
        let drained = buffer.drain(None).await.unwrap();
        assert_eq!(drained.len(), 5);
        assert_eq!(buffer.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_drains_process_each_entry_exactly_once() {
        let buffer = Arc::new(MemoryLogBuffer::new());
        for i in 0..100u8 {
            buffer.add(vec![i]).await.unwrap();
        }

        let mut handles = Vec::new();
        for _ in 0..4 {
            let buffer = Arc::clone(&buffer);
            handles.push(tokio::spawn(
                async move { buffer.drain(Some(40)).await.unwrap() },
            ));
        }

        let mut seen: Vec<Vec<u8>> = Vec::new();
        for handle in handles {
            seen.extend(handle.await.unwrap());
        }

        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 100, "no entry lost or drained twice");
        assert_eq!(buffer.len().await.unwrap(), 0);
    }
}
