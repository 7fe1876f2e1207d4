//! Request body size guard.
//!
//! Rejects requests whose `Content-Length` exceeds the limit before any
//! handler runs. Bodies without a length header are capped separately by
//! axum's `DefaultBodyLimit` in the router.

use axum::extract::{Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::http::error::AppError;

pub async fn limit_request_size(
    State(max_body_bytes): State<usize>,
    request: Request,
    next: Next,
) -> Response {
    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    if declared.is_some_and(|len| len > max_body_bytes as u64) {
        tracing::warn!(
            content_length = declared,
            limit = max_body_bytes,
            "rejecting oversized request"
        );
        return AppError::PayloadTooLarge.into_response();
    }

    next.run(request).await
}
