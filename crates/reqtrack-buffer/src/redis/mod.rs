//! Redis buffer backend.

pub mod buffer;
pub mod client;

pub use buffer::RedisLogBuffer;
pub use client::RedisClient;
