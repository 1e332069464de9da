//! Shared building blocks for the registry crates: logging bootstrap and the
//! generic response bodies returned by the HTTP layer.

pub mod types;
pub mod utils;
