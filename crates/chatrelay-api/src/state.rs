//! Application state wiring the store, provider, and prompt source together.
//!
//! Everything is constructed once at startup and shared with every request
//! handler through axum state; there is no global session store.

use std::sync::Arc;
use std::time::Duration;

use chatrelay_core::chat::service::ChatService;
use chatrelay_core::llm::box_provider::BoxChatProvider;
use chatrelay_core::llm::provider::ChatProvider;
use chatrelay_core::session::store::SessionStore;
use chatrelay_infra::llm::create_provider;
use chatrelay_infra::prompt::FilePromptSource;
use chatrelay_infra::tls::ensure_ca_bundle;
use chatrelay_types::config::{ProviderKind, RelayConfig};

/// Chat service pinned to the concrete infra implementations.
pub type ConcreteChatService = ChatService<BoxChatProvider, FilePromptSource>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub store: Arc<SessionStore>,
}

impl AppState {
    pub fn new(store: Arc<SessionStore>, provider: BoxChatProvider, prompts: FilePromptSource) -> Self {
        let chat_service = ChatService::new(Arc::clone(&store), provider, prompts);
        Self {
            chat_service: Arc::new(chat_service),
            store,
        }
    }

    /// Build the state from configuration: fetch the CA bundle if needed,
    /// pick the upstream provider, and create an empty session store.
    pub async fn init(config: &RelayConfig) -> anyhow::Result<Self> {
        let provider_config = &config.provider;

        if provider_config.kind == ProviderKind::Gateway {
            if let (Some(cert_file), Some(ca_url)) = (&provider_config.cert_file, &provider_config.ca_url) {
                // Without the bundle the client falls back to system roots.
                let timeout = Duration::from_secs(provider_config.timeout_secs);
                if let Err(e) = ensure_ca_bundle(cert_file, ca_url, timeout).await {
                    tracing::warn!(error = %e, "could not fetch CA bundle");
                }
            }
        }

        let provider = create_provider(provider_config)?;

        let store = Arc::new(SessionStore::new(
            Duration::from_secs(config.session.ttl_seconds),
            config.session.max_messages,
        ));
        tracing::info!(
            ttl_seconds = config.session.ttl_seconds,
            max_messages = config.session.max_messages,
            provider = provider.name(),
            "session store ready"
        );

        let prompts = FilePromptSource::from_config(&config.prompt);

        Ok(Self::new(store, provider, prompts))
    }
}
