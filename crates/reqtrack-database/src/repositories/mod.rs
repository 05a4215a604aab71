//! Concrete repository implementations.

pub mod ip_address;
pub mod request_log;

pub use ip_address::IpAddressRepository;
pub use request_log::{LogSearchFilter, RequestLogRepository};
