//! BoxChatProvider -- object-safe dynamic dispatch wrapper for ChatProvider.
//!
//! 1. Define an object-safe `ChatProviderDyn` trait with boxed futures
//! 2. Blanket-impl `ChatProviderDyn` for all `T: ChatProvider`
//! 3. `BoxChatProvider` wraps `Box<dyn ChatProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use chatrelay_types::chat::Turn;
use chatrelay_types::error::UpstreamError;

use super::provider::ChatProvider;

/// Object-safe version of [`ChatProvider`] with boxed futures.
pub trait ChatProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn send_boxed<'a>(
        &'a self,
        messages: &'a [Turn],
    ) -> Pin<Box<dyn Future<Output = Result<String, UpstreamError>> + Send + 'a>>;
}

impl<T: ChatProvider> ChatProviderDyn for T {
    fn name(&self) -> &str {
        ChatProvider::name(self)
    }

    fn send_boxed<'a>(
        &'a self,
        messages: &'a [Turn],
    ) -> Pin<Box<dyn Future<Output = Result<String, UpstreamError>> + Send + 'a>> {
        Box::pin(self.send(messages))
    }
}

/// Type-erased provider, chosen at runtime from configuration.
pub struct BoxChatProvider {
    inner: Box<dyn ChatProviderDyn>,
}

impl BoxChatProvider {
    pub fn new<T: ChatProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }
}

impl ChatProvider for BoxChatProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn send(&self, messages: &[Turn]) -> Result<String, UpstreamError> {
        self.inner.send_boxed(messages).await
    }
}
