//! Trait seams for pluggable backends.

pub mod buffer;
pub mod store;

pub use buffer::LogBuffer;
pub use store::LogStore;
