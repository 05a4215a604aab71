//! Shared value types.

pub mod envelope;
pub mod pagination;
pub mod record;
