use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("service '{name}' not found")]
    NotFound { name: String },
    #[error("service '{name}' with version {version} not found")]
    VersionNotFound { name: String, version: i32 },
    #[error("service '{name}' already exists")]
    DuplicateName { name: String },
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(name: &str) -> Self { Self::NotFound { name: name.to_string() } }

    pub fn version_not_found(name: &str, version: i32) -> Self {
        Self::VersionNotFound { name: name.to_string(), version }
    }

    pub fn duplicate_name(name: &str) -> Self { Self::DuplicateName { name: name.to_string() } }

    /// Stable code for external mapping/logging
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "error_invalid_input",
            ServiceError::NotFound { .. } => "service_not_found",
            ServiceError::VersionNotFound { .. } => "service_with_provided_name_and_version_not_found",
            ServiceError::DuplicateName { .. } => "service_found_with_the_same_name",
            ServiceError::Db(_) => "internal_server_error",
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_keep_their_kind() {
        assert!(matches!(ServiceError::from(ModelError::Validation("x".into())), ServiceError::Validation(_)));
        assert!(matches!(ServiceError::from(ModelError::Db("gone".into())), ServiceError::Db(m) if m == "gone"));
    }

    #[test]
    fn codes_are_distinct_per_kind() {
        let errs = [
            ServiceError::Validation("v".into()),
            ServiceError::not_found("a"),
            ServiceError::version_not_found("a", 2),
            ServiceError::duplicate_name("a"),
            ServiceError::Db("d".into()),
        ];
        let mut codes: Vec<_> = errs.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
        assert_eq!(ServiceError::version_not_found("svc-a", 2).to_string(), "service 'svc-a' with version 2 not found");
    }
}
