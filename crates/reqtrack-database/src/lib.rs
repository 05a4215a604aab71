//! # reqtrack-database
//!
//! PostgreSQL connection management, migrations, and the concrete
//! [`LogStore`](reqtrack_core::traits::LogStore) implementation backed by
//! the IP registry and request log repositories.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryLogStore;
pub use store::PgLogStore;
