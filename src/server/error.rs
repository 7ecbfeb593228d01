//! Mapping of conversation errors onto HTTP responses.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::conversation::TranscriptError;

/// Error returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Failure raised by the conversation service.
    Transcript(TranscriptError),
    /// Request body or path could not be parsed.
    BadRequest(String),
}

impl From<TranscriptError> for ApiError {
    fn from(err: TranscriptError) -> Self {
        Self::Transcript(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Transcript(TranscriptError::Validation(msg)) | Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            Self::Transcript(err @ TranscriptError::StoreUnavailable(_)) => {
                tracing::error!("store failure: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "STORE_UNAVAILABLE", err.to_string())
            }
            Self::Transcript(err) => {
                tracing::error!("internal failure: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", err.to_string())
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}
