//! ChatCompletionsProvider -- [`ChatProvider`] over an OpenAI-style
//! `chat/completions` endpoint.
//!
//! Serves both upstream flavours:
//! - OpenAI-compatible: `{base_url}/v1/chat/completions`, bearer key.
//! - Gateway: a full endpoint URL, bearer token plus an `x-apikey` client
//!   id, optionally trusting an extra CA bundle.
//!
//! Credentials are stored as [`SecretString`] and only exposed while
//! building request headers.

use std::path::Path;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use chatrelay_core::llm::provider::ChatProvider;
use chatrelay_types::chat::Turn;
use chatrelay_types::error::UpstreamError;

use super::types::{ChatCompletionRequest, parse_reply};
use crate::tls;

/// Upstream provider speaking the chat-completions protocol.
///
/// Intentionally does NOT derive Debug.
pub struct ChatCompletionsProvider {
    client: reqwest::Client,
    name: String,
    endpoint: String,
    model: String,
    api_key: SecretString,
    client_id: Option<SecretString>,
}

impl ChatCompletionsProvider {
    /// Provider for `{base_url}/v1/chat/completions`.
    pub fn openai_compatible(
        base_url: &str,
        api_key: SecretString,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = build_client(timeout, None)?;
        Ok(Self {
            client,
            name: "openai_compatible".to_string(),
            endpoint: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key,
            client_id: None,
        })
    }

    /// Provider for a gateway endpoint that also wants an `x-apikey` header.
    ///
    /// When `ca_bundle` points at an existing PEM file its certificates are
    /// trusted in addition to the system roots.
    pub fn gateway(
        api_url: &str,
        api_key: SecretString,
        client_id: SecretString,
        model: &str,
        timeout: Duration,
        ca_bundle: Option<&Path>,
    ) -> Result<Self, UpstreamError> {
        let client = build_client(timeout, ca_bundle)?;
        Ok(Self {
            client,
            name: "gateway".to_string(),
            endpoint: api_url.to_string(),
            model: model.to_string(),
            api_key,
            client_id: Some(client_id),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn build_client(timeout: Duration, ca_bundle: Option<&Path>) -> Result<reqwest::Client, UpstreamError> {
    let mut builder = reqwest::Client::builder().timeout(timeout);

    if let Some(path) = ca_bundle {
        if path.exists() {
            let certs = tls::load_root_certificates(path)
                .map_err(|e| UpstreamError::Client(e.to_string()))?;
            tracing::debug!(path = %path.display(), count = certs.len(), "trusting extra CA certificates");
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        } else {
            tracing::warn!(
                path = %path.display(),
                "CA bundle not found; using system trust roots only"
            );
        }
    }

    builder
        .build()
        .map_err(|e| UpstreamError::Client(format!("failed to create HTTP client: {e}")))
}

impl ChatProvider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, messages: &[Turn]) -> Result<String, UpstreamError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body);
        if let Some(client_id) = &self.client_id {
            request = request.header("x-apikey", client_id.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(format!("failed to read response body: {e}")))?;
        parse_reply(&text)
    }
}
