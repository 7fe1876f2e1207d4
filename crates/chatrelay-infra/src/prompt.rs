//! File-backed [`PromptSource`].
//!
//! Resolution order on every call: inline prompt, then the prompt file
//! (trimmed), then [`DEFAULT_SYSTEM_PROMPT`].

use std::path::PathBuf;

use chatrelay_core::prompt::{DEFAULT_SYSTEM_PROMPT, PromptSource};
use chatrelay_types::config::PromptConfig;

#[derive(Debug, Clone)]
pub struct FilePromptSource {
    inline: Option<String>,
    path: PathBuf,
}

impl FilePromptSource {
    pub fn new(inline: Option<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            inline: inline.filter(|p| !p.is_empty()),
            path: path.into(),
        }
    }

    pub fn from_config(config: &PromptConfig) -> Self {
        Self::new(config.system_prompt.clone(), config.system_prompt_path.clone())
    }
}

impl PromptSource for FilePromptSource {
    async fn system_prompt(&self) -> String {
        if let Some(inline) = &self.inline {
            return inline.clone();
        }

        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    DEFAULT_SYSTEM_PROMPT.to_string()
                } else {
                    trimmed.to_string()
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DEFAULT_SYSTEM_PROMPT.to_string(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read system prompt file");
                DEFAULT_SYSTEM_PROMPT.to_string()
            }
        }
    }
}
