//! Error handling module for the team roster service.
//!
//! Domain errors for the form, the pipeline and the outbound client, plus the
//! application error with its mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::DraftField;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const IMAGE_DECODE_ERROR: &str = "IMAGE_DECODE_ERROR";
    pub const SUBMISSION_PENDING: &str = "SUBMISSION_PENDING";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// A draft failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields (missing: {})", join_fields(.fields))]
    MissingRequiredField { fields: Vec<DraftField> },
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(DraftField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// An uploaded image could not be turned into a preview.
#[derive(Debug, Error)]
pub enum ImageDecodeError {
    #[error("image file is empty")]
    Empty,

    #[error("image is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },

    #[error("image data is not valid base64: {0}")]
    InvalidEncoding(String),

    #[error("content type {0:?} is not an image")]
    NotAnImage(String),

    #[error("image file could not be read: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("preview encoder failed: {0}")]
    Worker(String),
}

/// A submission attempt did not produce a record.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another submission is still pending; this call changed nothing.
    #[error("a submission is already in progress")]
    AlreadyPending,

    #[error("submission task stopped before committing: {0}")]
    Aborted(String),
}

/// Failure of the outbound team-member call.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Failed to submit team member: server responded with {status}")]
    Status { status: reqwest::StatusCode },

    #[error("Failed to submit team member: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Required fields missing
    Validation {
        message: String,
        missing: Vec<DraftField>,
    },
    /// Image could not be decoded
    ImageDecode(String),
    /// A submission is already pending
    SubmissionPending(String),
    /// Internal server error
    Internal(String),
    /// Bad request
    BadRequest(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::ImageDecode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::SubmissionPending(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation { .. } => codes::VALIDATION_ERROR,
            AppError::ImageDecode(_) => codes::IMAGE_DECODE_ERROR,
            AppError::SubmissionPending(_) => codes::SUBMISSION_PENDING,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation { message, .. } => message.clone(),
            AppError::ImageDecode(msg) => msg.clone(),
            AppError::SubmissionPending(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let message = err.to_string();
        match err {
            ValidationError::MissingRequiredField { fields } => AppError::Validation {
                message,
                missing: fields,
            },
        }
    }
}

impl From<ImageDecodeError> for AppError {
    fn from(err: ImageDecodeError) -> Self {
        AppError::ImageDecode(err.to_string())
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        let message = err.to_string();
        match err {
            SubmitError::Validation(e) => e.into(),
            SubmitError::AlreadyPending => AppError::SubmissionPending(message),
            SubmitError::Aborted(_) => {
                tracing::error!("Submission error: {}", message);
                AppError::Internal(message)
            }
        }
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub revision_id: i64,
}

impl ErrorResponse {
    pub fn new(error: &AppError, revision_id: i64) -> Self {
        let details = match error {
            AppError::Validation { missing, .. } => {
                Some(serde_json::json!({ "missingFields": missing }))
            }
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
            revision_id,
        }
    }
}

/// Wrapper type for errors that carry revision_id context.
pub struct AppErrorWithRevision {
    pub error: AppError,
    pub revision_id: i64,
}

impl IntoResponse for AppErrorWithRevision {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, self.revision_id);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_missing_fields() {
        let err = ValidationError::MissingRequiredField {
            fields: vec![DraftField::FullName, DraftField::RoleTag],
        };
        assert_eq!(
            err.to_string(),
            "Please fill in all required fields (missing: fullName, roleTag)"
        );
    }

    #[test]
    fn test_submit_error_mapping() {
        let pending: AppError = SubmitError::AlreadyPending.into();
        assert_eq!(pending.status_code(), StatusCode::CONFLICT);
        assert_eq!(pending.error_code(), codes::SUBMISSION_PENDING);

        let invalid: AppError = SubmitError::Validation(ValidationError::MissingRequiredField {
            fields: vec![DraftField::TeamName],
        })
        .into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.error_code(), codes::VALIDATION_ERROR);
    }

    #[test]
    fn test_error_envelope_carries_missing_fields() {
        let err: AppError = ValidationError::MissingRequiredField {
            fields: vec![DraftField::GithubProfile],
        }
        .into();
        let body = serde_json::to_value(ErrorResponse::new(&err, 4)).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"]["missingFields"][0], "githubProfile");
        assert_eq!(body["revisionId"], 4);
    }

    #[test]
    fn test_image_error_is_unprocessable() {
        let err: AppError = ImageDecodeError::Empty.into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message(), "image file is empty");
    }
}
