use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error rendered as `{message, error}` with an explicit status.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self { status, body: ErrorBody::new(message, error) }
    }

    pub fn bad_request(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, error)
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let code = e.code();
        match e {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg, code),
            ServiceError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, "service not found.", code),
            ServiceError::VersionNotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "service with name and version not found.", code)
            }
            ServiceError::DuplicateName { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "service with same name found, please use update api.", code)
            }
            ServiceError::Db(detail) => {
                // storage details stay in the log
                error!(error = %detail, "storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, code)
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        Self::bad_request("request body validation failed", r.body_text())
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(r: PathRejection) -> Self {
        Self::bad_request("version is not a int", r.body_text())
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(r: QueryRejection) -> Self {
        Self::bad_request("invalid query parameters", r.body_text())
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, #[source] source: std::io::Error },
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("migrations failed: {0}")]
    Migration(String),
}
