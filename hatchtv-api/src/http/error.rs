// HTTP error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;

/// Application error with HTTP status code
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    // Convenience alias
    pub fn internal(message: impl Into<String>) -> Self {
        Self::internal_server_error(message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {}

/// Error response JSON structure
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });

        (self.status, body).into_response()
    }
}

/// Convert hatchtv_core errors to HTTP errors
impl From<hatchtv_core::Error> for AppError {
    fn from(err: hatchtv_core::Error) -> Self {
        use hatchtv_core::Error;

        match err {
            Error::Validation(msg) => AppError::bad_request(msg),
            Error::UnsupportedFormat(_) => AppError::bad_request("Video Format is not supported"),
            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                AppError::internal_server_error(e.to_string())
            }
            Error::RemoteStore(msg) => {
                tracing::error!("Remote store error: {}", msg);
                AppError::internal_server_error(msg)
            }
            Error::ManifestParse(e) => {
                tracing::error!("Manifest parse error: {}", e);
                AppError::internal_server_error(format!("hatch manifest is malformed: {e}"))
            }
            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                AppError::internal_server_error(msg)
            }
        }
    }
}
