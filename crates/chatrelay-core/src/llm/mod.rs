//! Upstream chat-completion provider abstraction.

pub mod box_provider;
pub mod provider;
