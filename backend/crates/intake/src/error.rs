//! Intake Error Types
//!
//! This module provides intake-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::google::GoogleAuthError;
use thiserror::Error;

/// Intake-specific result type alias
pub type IntakeResult<T> = Result<T, IntakeError>;

/// Client input faults, detected before any external call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no files uploaded")]
    NoFiles,

    #[error("too many files: at most {max} images per submission")]
    TooManyFiles { max: usize },

    #[error("total upload size exceeds {limit_mib} MiB")]
    PayloadTooLarge { limit_mib: u64 },

    #[error("firstName, lastName and phone are required")]
    MissingFields,
}

/// Intake-specific error variants
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Submission rejected by validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The multipart body could not be read
    #[error("malformed upload: {0}")]
    MalformedForm(String),

    /// Buffering an upload to local temporary storage failed
    #[error("temporary storage error: {0}")]
    TempStorage(#[from] std::io::Error),

    /// Google Drive, Google Sheets or the token endpoint failed
    #[error("{service} failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },
}

impl IntakeError {
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        IntakeError::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntakeError::Validation(_) | IntakeError::MalformedForm(_) => StatusCode::BAD_REQUEST,
            IntakeError::TempStorage(_) | IntakeError::Upstream { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IntakeError::Validation(_) | IntakeError::MalformedForm(_) => ErrorKind::BadRequest,
            IntakeError::TempStorage(_) | IntakeError::Upstream { .. } => {
                ErrorKind::InternalServerError
            }
        }
    }

    fn log(&self) {
        match self {
            IntakeError::Upstream { service, message } => {
                tracing::error!(service = %service, message = %message, "Upstream service error");
            }
            IntakeError::TempStorage(e) => {
                tracing::error!(error = %e, "Temporary storage error");
            }
            IntakeError::Validation(e) => {
                tracing::info!(reason = %e, "Submission rejected");
            }
            IntakeError::MalformedForm(msg) => {
                tracing::warn!(message = %msg, "Malformed multipart body");
            }
        }
    }
}

impl From<GoogleAuthError> for IntakeError {
    fn from(err: GoogleAuthError) -> Self {
        IntakeError::upstream("Google authentication", err.to_string())
    }
}

/// Message shown to the caller when local buffering fails; the I/O
/// error itself only reaches the logs.
pub const TEMP_STORAGE_MESSAGE: &str = "failed to buffer upload";

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::TempStorage(e) => AppError::internal(TEMP_STORAGE_MESSAGE).with_source(e),
            IntakeError::Upstream { .. } => AppError::internal(err.to_string()),
            IntakeError::Validation(_) | IntakeError::MalformedForm(_) => {
                AppError::bad_request(err.to_string())
            }
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
