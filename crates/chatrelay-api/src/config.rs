//! Configuration loading: TOML file, then environment overrides.
//!
//! CLI flags are applied on top by `main`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chatrelay_types::config::{ProviderKind, RelayConfig};
use chatrelay_types::error::ConfigError;

/// Load the config file at `path` (if any) and apply environment overrides.
pub fn load(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => RelayConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Overlay environment variables onto `config`.
///
/// `lookup` returns the raw value for a variable name. Empty values count as
/// unset; so do whitespace-only values, except for `SYSTEM_PROMPT`, which is
/// used verbatim whenever it is non-empty. Provider credentials are read from
/// the variables belonging to the selected provider kind only.
pub fn apply_env_overrides(
    config: &mut RelayConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let get_verbatim = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(host) = get("HOST") {
        config.server.host = host;
    }
    if let Some(port) = get("PORT") {
        config.server.port = parse("PORT", &port)?;
    }
    if let Some(max) = get("MAX_BODY_BYTES") {
        config.server.max_body_bytes = parse("MAX_BODY_BYTES", &max)?;
    }
    if let Some(origins) = get("CORS_ORIGINS") {
        config.server.cors_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(dir) = get("STATIC_DIR") {
        config.server.static_dir = PathBuf::from(dir);
    }

    if let Some(ttl) = get("SESSION_TTL_SECONDS") {
        config.session.ttl_seconds = parse("SESSION_TTL_SECONDS", &ttl)?;
    }
    if let Some(max) = get("MAX_MESSAGES") {
        config.session.max_messages = parse("MAX_MESSAGES", &max)?;
    }
    if let Some(interval) = get("SWEEP_INTERVAL_SECONDS") {
        config.session.sweep_interval_seconds = parse("SWEEP_INTERVAL_SECONDS", &interval)?;
    }

    if let Some(prompt) = get_verbatim("SYSTEM_PROMPT") {
        config.prompt.system_prompt = Some(prompt);
    }
    if let Some(path) = get("SYSTEM_PROMPT_PATH") {
        config.prompt.system_prompt_path = PathBuf::from(path);
    }

    let provider = &mut config.provider;
    if let Some(kind) = get("LLM_PROVIDER") {
        provider.kind = ProviderKind::from_str(&kind).map_err(|_| ConfigError::InvalidValue {
            key: "LLM_PROVIDER".to_string(),
            value: kind,
        })?;
    }
    if let Some(timeout) = get("LLM_TIMEOUT_SECONDS") {
        provider.timeout_secs = parse("LLM_TIMEOUT_SECONDS", &timeout)?;
    }
    match provider.kind {
        ProviderKind::OpenAiCompatible => {
            override_opt(&mut provider.base_url, get("LLM_BASE_URL"));
            override_opt(&mut provider.api_key, get("LLM_API_KEY"));
            override_opt(&mut provider.model, get("LLM_MODEL"));
        }
        ProviderKind::Gateway => {
            override_opt(&mut provider.api_url, get("GATEWAY_API_URL"));
            override_opt(&mut provider.api_key, get("GATEWAY_API_TOKEN"));
            override_opt(&mut provider.client_id, get("GATEWAY_CLIENT_ID"));
            override_opt(&mut provider.model, get("GATEWAY_MODEL"));
            if let Some(cert) = get("GATEWAY_CERT_FILE") {
                provider.cert_file = Some(PathBuf::from(cert));
            }
            override_opt(&mut provider.ca_url, get("GATEWAY_CA_URL"));
        }
    }

    Ok(())
}

fn override_opt(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
