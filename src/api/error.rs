//! API error types with HTTP status mapping.
//!
//! Most routes answer errors as JSON `{error:{code,message}}`. The upload
//! route keeps its plain-text contract, so `Rejected` and `ServerError`
//! render as `text/plain`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::processor::ProcessingError;

/// Plain-text body sent with every upload failure that is not the caller's.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    /// Client mistake on the upload route, answered as plain text.
    #[error("Upload rejected: {0}")]
    Rejected(String),
    /// Server-side failure on the upload route, answered as plain text.
    #[error("Upload failed: {0}")]
    ServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Rejected(message) => {
                return (StatusCode::BAD_REQUEST, message).into_response();
            }
            ApiError::ServerError(detail) => {
                tracing::error!(detail, "Upload processing failed");
                return (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE).into_response();
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<crate::db::DatabaseError> for ApiError {
    fn from(err: crate::db::DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Background task failed: {err}"))
    }
}

/// Pipeline failures on the upload route. A file that is not a PDF is the
/// caller's fault; everything else is ours.
impl From<ProcessingError> for ApiError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Extraction(ExtractionError::NotPdf) => {
                ApiError::Rejected("Uploaded file is not a PDF".into())
            }
            other => ApiError::ServerError(other.to_string()),
        }
    }
}
