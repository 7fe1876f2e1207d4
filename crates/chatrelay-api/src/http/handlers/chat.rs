//! Chat relay endpoint.
//!
//! POST /api/chat
//!
//! Request: `{ "message": "...", "session_id": "..." }` (`session_id` optional).
//! Response: `{ "session_id": "...", "reply": "..." }`.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde_json::Value;

use chatrelay_types::chat::ChatReply;

use crate::http::error::AppError;
use crate::state::AppState;

/// A decoded, validated chat request.
#[derive(Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: String,
}

impl ChatRequest {
    /// Validate a raw JSON body.
    ///
    /// `message` must be a non-empty string. A missing, null, empty, or
    /// non-string `session_id` means "start a new session".
    pub fn from_value(body: &Value) -> Result<Self, AppError> {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AppError::Validation("Message is required.".to_string()))?;

        let session_id = body
            .get("session_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        Ok(Self {
            session_id,
            message: message.to_string(),
        })
    }
}

/// POST /api/chat -- relay one user message and return the reply.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(body) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::Validation(rejection.body_text())
        }
    })?;

    let request = ChatRequest::from_value(&body)?;
    let reply = state
        .chat_service
        .handle(request.session_id, &request.message)
        .await;

    Ok(Json(reply))
}
