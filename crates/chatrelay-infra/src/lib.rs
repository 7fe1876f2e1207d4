//! Infrastructure layer for chatrelay.
//!
//! Implements the ports defined in `chatrelay-core`: HTTP clients for the
//! upstream chat-completion providers and a file-backed system prompt
//! source. Also bootstraps the custom CA bundle some upstreams require.

pub mod llm;
pub mod prompt;
pub mod tls;
