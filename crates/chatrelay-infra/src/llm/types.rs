//! Chat-completions wire types (OpenAI request/response shape).
//!
//! Only the fields the relay reads are modelled; everything else in the
//! upstream response is ignored.

use serde::{Deserialize, Serialize};

use chatrelay_types::chat::Turn;
use chatrelay_types::error::UpstreamError;

/// Request body for `POST .../chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Turn],
}

/// Non-streaming chat-completions response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of `choices[0].message.content`.
    pub fn into_reply(self) -> Result<String, UpstreamError> {
        self.choices
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::MalformedResponse("response has no choices".to_string()))?
            .message
            .ok_or_else(|| UpstreamError::MalformedResponse("first choice has no message".to_string()))?
            .content
            .ok_or_else(|| UpstreamError::MalformedResponse("message has no content".to_string()))
    }
}

/// Parse a raw response body into the reply text.
pub fn parse_reply(body: &str) -> Result<String, UpstreamError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| UpstreamError::MalformedResponse(format!("invalid JSON: {e}")))?;
    response.into_reply()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_turns_in_wire_shape() {
        let turns = [Turn::system("sys"), Turn::user("hi")];
        let body = ChatCompletionRequest {
            model: "gpt-4o",
            messages: &turns,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ]
            })
        );
    }

    #[test]
    fn test_parse_reply_first_choice() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hello!"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"prompt_tokens": 3, "completion_tokens": 2}
        }"#;
        assert_eq!(parse_reply(body).unwrap(), "Hello!");
    }

    #[test]
    fn test_parse_reply_empty_choices() {
        let err = parse_reply(r#"{"choices": []}"#).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_reply_missing_choices() {
        let err = parse_reply(r#"{"error": "nope"}"#).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_reply_null_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        assert!(parse_reply(body).unwrap_err().is_malformed());
    }

    #[test]
    fn test_parse_reply_not_json() {
        let err = parse_reply("<html>bad gateway</html>").unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }
}
