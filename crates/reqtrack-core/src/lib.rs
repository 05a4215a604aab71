//! # reqtrack-core
//!
//! Core crate for reqtrack. Contains configuration schemas, the buffer and
//! store traits, the buffered wire envelope, pagination types, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other reqtrack crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
