//! Versioned service registry: three-layer architecture (domain, repository, service).
//!
//! Mutations append a new version row per name; listings group rows by name
//! and report each name's current version.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod response;
pub mod search;
pub mod service;

pub use search::SearchEngine;
pub use service::RegistryService;
