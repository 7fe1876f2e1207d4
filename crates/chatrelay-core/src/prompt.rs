//! PromptSource trait: where the system prompt comes from.

use std::future::Future;

/// Fallback system prompt when no other source yields one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer clearly and concisely, \
and ask follow-up questions when helpful.";

/// Supplies the system prompt prepended to every upstream request.
///
/// Resolved per request so edits to a prompt file take effect without a
/// restart.
pub trait PromptSource: Send + Sync {
    fn system_prompt(&self) -> impl Future<Output = String> + Send;
}

/// A fixed prompt.
#[derive(Debug, Clone)]
pub struct StaticPrompt(pub String);

impl Default for StaticPrompt {
    fn default() -> Self {
        Self(DEFAULT_SYSTEM_PROMPT.to_string())
    }
}

impl PromptSource for StaticPrompt {
    async fn system_prompt(&self) -> String {
        self.0.clone()
    }
}
