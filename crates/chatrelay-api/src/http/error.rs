//! Application error type mapping to HTTP status codes.
//!
//! Error bodies use the `{"detail": "..."}` shape the chat page expects.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Client sent an unusable request.
    Validation(String),
    /// Declared or actual body size exceeds the configured limit.
    PayloadTooLarge,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large.".to_string(),
            ),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
