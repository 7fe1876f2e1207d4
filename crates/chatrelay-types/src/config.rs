//! Relay configuration types.
//!
//! `RelayConfig` is the top-level configuration, optionally loaded from a
//! TOML file and then overridden from the environment by the binary. Every
//! field has a default, so an empty file (or no file) is a valid config.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration for the relay.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
}

impl RelayConfig {
    /// Reject values the relay cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.max_messages == 0 {
            return Err(ConfigError::Invalid(
                "session.max_messages must be at least 1".to_string(),
            ));
        }
        if self.session.ttl_seconds == 0 {
            return Err(ConfigError::Invalid(
                "session.ttl_seconds must be greater than 0".to_string(),
            ));
        }
        if self.session.sweep_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "session.sweep_interval_seconds must be greater than 0".to_string(),
            ));
        }
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Requests declaring a larger `Content-Length` are rejected with 413.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Directory holding `index.html` and static assets for the chat page.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    1_048_576
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8080".to_string(),
        "http://127.0.0.1:8080".to_string(),
    ]
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            cors_origins: default_cors_origins(),
            static_dir: default_static_dir(),
        }
    }
}

/// Session store tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Idle time after which a session is swept.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Sliding-window cap on turns kept per session.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
}

fn default_ttl_seconds() -> u64 {
    1800
}

fn default_max_messages() -> usize {
    20
}

fn default_sweep_interval_seconds() -> u64 {
    300
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            max_messages: default_max_messages(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
        }
    }
}

/// Which upstream protocol flavour to speak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// `{base_url}/v1/chat/completions` with a bearer key.
    #[default]
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
    /// Fixed endpoint URL with bearer token, client id header, and custom CA.
    Gateway,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAiCompatible => write!(f, "openai_compatible"),
            ProviderKind::Gateway => write!(f, "gateway"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai_compatible" | "openai" => Ok(ProviderKind::OpenAiCompatible),
            "gateway" => Ok(ProviderKind::Gateway),
            other => Err(format!("invalid provider kind: '{other}'")),
        }
    }
}

/// Upstream provider settings.
///
/// Credentials are plain strings here; the infra layer wraps them in
/// `SecretString` before use. `Debug` is implemented by hand so they never
/// reach logs.
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    /// Base URL for the OpenAI-compatible flavour.
    pub base_url: Option<String>,
    /// Full endpoint URL for the gateway flavour.
    pub api_url: Option<String>,
    /// Bearer credential for either flavour.
    pub api_key: Option<String>,
    /// Sent as `x-apikey` by the gateway flavour.
    pub client_id: Option<String>,
    pub model: Option<String>,
    /// PEM bundle trusted in addition to the system roots (gateway only).
    pub cert_file: Option<PathBuf>,
    /// Where to fetch `cert_file` from when it does not exist yet.
    pub ca_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            base_url: None,
            api_url: None,
            api_key: None,
            client_id: None,
            model: None,
            cert_file: None,
            ca_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("client_id", &self.client_id.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("cert_file", &self.cert_file)
            .field("ca_url", &self.ca_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// System prompt sources, consulted on every chat request.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptConfig {
    /// Inline prompt; wins over the file when non-empty.
    pub system_prompt: Option<String>,
    #[serde(default = "default_system_prompt_path")]
    pub system_prompt_path: PathBuf,
}

fn default_system_prompt_path() -> PathBuf {
    PathBuf::from("system_prompt.txt")
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            system_prompt_path: default_system_prompt_path(),
        }
    }
}
