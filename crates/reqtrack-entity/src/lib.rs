//! # reqtrack-entity
//!
//! Database entity models for reqtrack. Every struct in this crate
//! represents a table row or a read-side projection. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and `sqlx::FromRow`.

pub mod ip_address;
pub mod request_log;

pub use ip_address::IpAddress;
pub use request_log::{RequestLog, RequestLogWithIp, StatusBand, UNKNOWN_IP};
