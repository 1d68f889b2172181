//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ingest_core::{ErrorKind, IngestError};
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Ingest(#[from] IngestError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<usize>,
}

impl ApiError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Ingest(IngestError::Busy) => (StatusCode::CONFLICT, "busy"),
            ApiError::Ingest(e) => match e.kind() {
                ErrorKind::Precondition => (StatusCode::BAD_REQUEST, "precondition_failed"),
                ErrorKind::Collaborator => (StatusCode::BAD_GATEWAY, "upstream_error"),
                ErrorKind::Import => (StatusCode::UNPROCESSABLE_ENTITY, "import_error"),
                ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();
        let position = match &self {
            ApiError::Ingest(e) => e.position(),
            _ => None,
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            position,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
