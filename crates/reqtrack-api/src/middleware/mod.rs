//! HTTP middleware.

pub mod principal;
pub mod track;
