use crate::services::storage_service::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

pub const NOT_FOUND_MESSAGE: &str = "File Not Found";
pub const INVALID_UPLOAD_MESSAGE: &str = "Invalid File Upload";
pub const INTERNAL_MESSAGE: &str = "Something went wrong";

/// A lightweight wrapper for general errors that keeps the message local.
///
/// The message is what the client sees; causes are logged where the error is
/// built and never leave the process.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 with the generic body.
    pub fn internal(cause: impl fmt::Display) -> Self {
        tracing::error!("request failed: {}", cause);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(cause: impl fmt::Display) -> Self {
        tracing::debug!("{}", cause);
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    }

    /// Shortcut for a rejected multipart upload.
    pub fn invalid_upload(cause: impl fmt::Display) -> Self {
        tracing::warn!("rejecting upload: {}", cause);
        Self::new(StatusCode::BAD_REQUEST, INVALID_UPLOAD_MESSAGE)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FileNotFound { .. } => AppError::not_found(err),
            StorageError::Backend(_) => AppError::internal(err),
        }
    }
}
