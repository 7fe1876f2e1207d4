//! Upstream provider implementations.
//!
//! [`create_provider`] turns a [`ProviderConfig`] into a [`BoxChatProvider`]:
//! a [`ChatCompletionsProvider`] when the required credentials are present,
//! otherwise an [`UnconfiguredProvider`] that explains what to set.

pub mod chat_completions;
pub mod types;
pub mod unconfigured;

use std::time::Duration;

use secrecy::SecretString;

use chatrelay_core::llm::box_provider::BoxChatProvider;
use chatrelay_types::config::{ProviderConfig, ProviderKind};
use chatrelay_types::error::UpstreamError;

use self::chat_completions::ChatCompletionsProvider;
use self::unconfigured::UnconfiguredProvider;

/// Endpoint used by the gateway flavour when none is configured.
pub const DEFAULT_GATEWAY_URL: &str = "https://api.gcp.cloud.bmw/llmapi/v1/chat/completions";

/// Model used by the gateway flavour when none is configured.
pub const DEFAULT_GATEWAY_MODEL: &str = "openai/gpt-4o";

/// Build the provider described by `config`.
///
/// Missing credentials are not an error: the relay keeps running with a
/// stub provider. Only HTTP client construction (e.g. an unreadable CA
/// bundle) can fail.
pub fn create_provider(config: &ProviderConfig) -> Result<BoxChatProvider, UpstreamError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

    match config.kind {
        ProviderKind::OpenAiCompatible => {
            let (Some(base_url), Some(api_key), Some(model)) = (
                present(&config.base_url),
                present(&config.api_key),
                present(&config.model),
            ) else {
                return Ok(BoxChatProvider::new(UnconfiguredProvider::new(
                    "openai_compatible",
                    "The AI API is not configured. Please set LLM_BASE_URL, LLM_API_KEY, and LLM_MODEL.",
                )));
            };
            let provider = ChatCompletionsProvider::openai_compatible(
                &base_url,
                SecretString::from(api_key),
                &model,
                timeout,
            )?;
            tracing::info!(endpoint = provider.endpoint(), model = provider.model(), "using OpenAI-compatible provider");
            Ok(BoxChatProvider::new(provider))
        }
        ProviderKind::Gateway => {
            let (Some(api_key), Some(client_id)) =
                (present(&config.api_key), present(&config.client_id))
            else {
                return Ok(BoxChatProvider::new(UnconfiguredProvider::new(
                    "gateway",
                    "The gateway API is not configured. Please set GATEWAY_API_TOKEN and GATEWAY_CLIENT_ID.",
                )));
            };
            let api_url = present(&config.api_url).unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());
            let model = present(&config.model).unwrap_or_else(|| DEFAULT_GATEWAY_MODEL.to_string());
            let provider = ChatCompletionsProvider::gateway(
                &api_url,
                SecretString::from(api_key),
                SecretString::from(client_id),
                &model,
                timeout,
                config.cert_file.as_deref(),
            )?;
            tracing::info!(endpoint = provider.endpoint(), model = provider.model(), "using gateway provider");
            Ok(BoxChatProvider::new(provider))
        }
    }
}
