//! Chat relay orchestration.

pub mod service;
