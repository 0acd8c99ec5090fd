use axum::response::{IntoResponse, Response};
use axum_helpers::errors::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Errors produced by the identity domain
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Wrong email and wrong password collapse into one answer so the
    /// endpoint does not leak which emails are registered.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Identity not found: {0}")]
    NotFound(Uuid),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            IdentityError::DuplicateEmail(_) => {
                AppError::Conflict("Email already registered".to_string())
            }
            IdentityError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            IdentityError::Hashing(msg) => AppError::InternalServerError(msg),
            IdentityError::Storage(msg) => AppError::Storage(msg),
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
