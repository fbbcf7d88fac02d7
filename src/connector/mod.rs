//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - OpenAI-compatible completions client (LM Studio)
//! - Deterministic fakes for self-test mode and tests

pub mod adapter;

pub use adapter::*;
