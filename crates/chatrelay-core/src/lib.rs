//! Business logic and port definitions for chatrelay.
//!
//! Owns the in-memory session store and its expiry sweeper, and defines the
//! ports (`ChatProvider`, `PromptSource`) that the infrastructure layer
//! implements. Depends only on `chatrelay-types` -- never on
//! `chatrelay-infra` or any HTTP crate.

pub mod chat;
pub mod llm;
pub mod prompt;
pub mod session;
