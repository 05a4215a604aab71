//! # reqtrack-buffer
//!
//! Buffer backends implementing [`reqtrack_core::traits::LogBuffer`]:
//! the Redis set buffer used in production and an in-memory equivalent
//! for development and tests.

pub mod memory;
pub mod redis;

pub use memory::MemoryLogBuffer;
pub use redis::{RedisClient, RedisLogBuffer};
