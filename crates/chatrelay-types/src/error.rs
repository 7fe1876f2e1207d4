use thiserror::Error;

/// Errors from an upstream chat-completion provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected upstream response: {0}")]
    MalformedResponse(String),

    #[error("upstream client setup failed: {0}")]
    Client(String),
}

impl UpstreamError {
    /// Whether the provider answered but with a payload we could not use.
    pub fn is_malformed(&self) -> bool {
        matches!(self, UpstreamError::MalformedResponse(_))
    }
}

/// Errors raised while loading or validating relay configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
