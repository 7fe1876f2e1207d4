//! Observability setup for chatrelay: structured logging via
//! `tracing-subscriber` with optional OpenTelemetry span export.

pub mod tracing_setup;
