//! Stand-in provider used when upstream credentials are missing.
//!
//! Answers every request with a notice explaining which settings to supply,
//! so the chat page stays usable while the relay is being set up.

use chatrelay_core::llm::provider::ChatProvider;
use chatrelay_types::chat::Turn;
use chatrelay_types::error::UpstreamError;

pub struct UnconfiguredProvider {
    name: String,
    notice: String,
}

impl UnconfiguredProvider {
    pub fn new(name: impl Into<String>, notice: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notice: notice.into(),
        }
    }
}

impl ChatProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, _messages: &[Turn]) -> Result<String, UpstreamError> {
        tracing::warn!(provider = %self.name, "upstream API not configured; returning stub response");
        Ok(self.notice.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_notice() {
        let provider = UnconfiguredProvider::new("gateway", "please configure me");
        let reply = provider.send(&[Turn::user("hi")]).await.unwrap();
        assert_eq!(reply, "please configure me");
        assert_eq!(provider.name(), "gateway");
    }
}
