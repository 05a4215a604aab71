//! # reqtrack-track
//!
//! The request tracking pipeline: per-request capture types, the IP
//! resolver, the logging policy engine, the entry builder, and the
//! recorder that routes accepted entries to the buffered or direct sink.

pub mod entry;
pub mod ip;
pub mod policy;
pub mod recorder;
pub mod request;

pub use entry::EntryBuilder;
pub use policy::PolicyEngine;
pub use recorder::{LogSink, RequestRecorder};
pub use request::{CapturedRequest, Principal};
