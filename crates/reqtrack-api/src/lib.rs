//! # reqtrack-api
//!
//! HTTP layer built on Axum: the tracking middleware that feeds the
//! recorder, principal extraction, the admin/maintenance endpoints, and
//! domain-error-to-HTTP mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use state::AppState;
