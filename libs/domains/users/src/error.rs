use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    /// Entity construction or mutation received an empty required field.
    /// Validators reject such input first, so reaching this is a caller bug.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("A user with this username or email already exists")]
    DuplicateUser,

    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User not found: {0}")]
    UsernameNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Operation cancelled")]
    Cancelled,

    /// Storage failure other than a unique violation; the status depends on the cause
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidArgument(msg) => AppError::BadRequest(msg),
            UserError::Validation(errors) => AppError::Validation(errors),
            UserError::DuplicateUser => AppError::Conflict(
                "A user with this username or email already exists".to_string(),
            ),
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::UsernameNotFound(username) => {
                AppError::NotFound(format!("User '{}' not found", username))
            }
            UserError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            UserError::Cancelled => AppError::Cancelled,
            UserError::PasswordHash(msg) => AppError::InternalServerError(msg),
            UserError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
