use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Movie not found: {0}")]
    MovieNotFound(Uuid),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A catalog entry is missing a required attribute. The catalog is
    /// maintained outside the recommender, so this surfaces as an internal
    /// data-integrity failure rather than a client error.
    #[error("Invalid catalog item: {0}")]
    InvalidItem(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::UserNotFound(_) | AppError::MovieNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidItem(_) | AppError::PasswordHash(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
