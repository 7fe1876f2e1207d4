//! ChatService -- relays one user message through the upstream provider.
//!
//! Flow: resolve system prompt -> read history (short lock) -> call provider
//! (no lock held) -> append user turn and reply together (short lock).
//!
//! Two requests for the same session may interleave between the read and the
//! append; each still records its own user/reply pair adjacently, but the
//! later one will not have seen the earlier one's turns as context.

use std::sync::Arc;

use tracing::Instrument;

use chatrelay_types::chat::{ChatReply, Turn};
use chatrelay_types::error::UpstreamError;

use crate::llm::provider::ChatProvider;
use crate::prompt::PromptSource;
use crate::session::clock::{Clock, SystemClock};
use crate::session::store::SessionStore;

/// Reply shown to the user when the provider could not be reached.
pub const UNAVAILABLE_REPLY: &str = "Sorry, the AI service is currently unavailable.";

/// Reply shown to the user when the provider answered with an unusable payload.
pub const MALFORMED_REPLY: &str = "Sorry, I received an unexpected response from the AI service.";

/// Orchestrates the session store, prompt source, and upstream provider.
pub struct ChatService<P, S, C: Clock = SystemClock> {
    store: Arc<SessionStore<C>>,
    provider: P,
    prompts: S,
}

impl<P, S, C> ChatService<P, S, C>
where
    P: ChatProvider,
    S: PromptSource,
    C: Clock,
{
    pub fn new(store: Arc<SessionStore<C>>, provider: P, prompts: S) -> Self {
        Self {
            store,
            provider,
            prompts,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore<C>> {
        &self.store
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Relay `message` within `session_id`, generating an id when none is given.
    ///
    /// Upstream failures never surface as errors: they become an apology
    /// reply, which is recorded in the history like any other reply.
    pub async fn handle(&self, session_id: Option<String>, message: &str) -> ChatReply {
        let session_id = session_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let system_prompt = self.prompts.system_prompt().await;
        let history = self.store.read(&session_id);

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Turn::system(system_prompt));
        messages.extend(history);
        messages.push(Turn::user(message));

        tracing::info!(
            session_id = %session_id,
            history_len = messages.len() - 2,
            message_len = message.len(),
            "relaying chat message"
        );

        let span = tracing::info_span!(
            "gen_ai.chat",
            gen_ai.system = self.provider.name(),
            gen_ai.request.messages = messages.len(),
        );
        let reply = match self.provider.send(&messages).instrument(span).await {
            Ok(reply) => reply,
            Err(e) => fallback_reply(self.provider.name(), &e).to_string(),
        };

        self.store
            .append_many(&session_id, [Turn::user(message), Turn::assistant(reply.clone())]);

        ChatReply { session_id, reply }
    }
}

fn fallback_reply(provider: &str, err: &UpstreamError) -> &'static str {
    if err.is_malformed() {
        tracing::error!(provider, error = %err, "unexpected upstream response shape");
        MALFORMED_REPLY
    } else {
        tracing::error!(provider, error = %err, "upstream request failed");
        UNAVAILABLE_REPLY
    }
}
