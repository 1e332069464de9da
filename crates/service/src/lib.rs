//! Service layer providing the versioned registry on top of models.
//! - Separates versioning and search rules from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod registry;
pub mod health;
#[cfg(test)]
pub mod test_support;
