//! Admin and maintenance handlers.

pub mod logs;
