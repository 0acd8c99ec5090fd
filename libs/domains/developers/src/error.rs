use axum::response::{IntoResponse, Response};
use axum_helpers::errors::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Errors produced by the developers domain
#[derive(Error, Debug)]
pub enum DeveloperError {
    #[error("Developer not found: {0}")]
    NotFound(Uuid),

    #[error("Developer email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Photo store error: {0}")]
    PhotoStore(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DeveloperResult<T> = Result<T, DeveloperError>;

impl From<DeveloperError> for AppError {
    fn from(err: DeveloperError) -> Self {
        match err {
            DeveloperError::NotFound(_) => AppError::NotFound("Developer not found".to_string()),
            DeveloperError::DuplicateEmail(_) => {
                AppError::Conflict("Developer email already exists".to_string())
            }
            DeveloperError::Validation(msg) => AppError::BadRequest(msg),
            DeveloperError::Forbidden(msg) => AppError::Forbidden(msg),
            DeveloperError::PhotoStore(msg) => AppError::Storage(msg),
            DeveloperError::Storage(msg) => AppError::Storage(msg),
            DeveloperError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for DeveloperError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
