//! ChatProvider trait definition.
//!
//! The one capability the relay needs from an upstream model: take the full
//! conversation context and return the assistant's reply text. Uses native
//! async fn in traits (RPITIT); see [`super::box_provider`] for the
//! object-safe wrapper.

use std::future::Future;

use chatrelay_types::chat::Turn;
use chatrelay_types::error::UpstreamError;

/// Trait for upstream chat-completion backends.
///
/// Implementations live in chatrelay-infra.
pub trait ChatProvider: Send + Sync {
    /// Human-readable provider name, used in logs and spans.
    fn name(&self) -> &str;

    /// Send the conversation (system prompt first) and return the reply text.
    fn send(&self, messages: &[Turn]) -> impl Future<Output = Result<String, UpstreamError>> + Send;
}
