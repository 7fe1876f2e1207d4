//! HTTP layer for chatrelay.
//!
//! Axum router exposing `POST /api/chat`, a health check, and the static
//! chat page, with CORS, request tracing, and a request body size guard.

pub mod error;
pub mod handlers;
pub mod limit;
pub mod router;
