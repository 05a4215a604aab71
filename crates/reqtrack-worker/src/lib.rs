//! # reqtrack-worker
//!
//! Scheduled background work: the batch flusher that moves buffered log
//! entries into the durable store, the retention task that prunes old
//! entries, and the cron scheduler that drives both.

pub mod flusher;
pub mod retention;
pub mod scheduler;

pub use flusher::{BufferFlusher, FlushOutcome};
pub use retention::RetentionTask;
pub use scheduler::CronScheduler;
