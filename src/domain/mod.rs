//! # Domain Layer
//!
//! Configuration, prompt templates and the error taxonomy.
//! This layer is independent of external frameworks and infrastructure.

pub mod models;
pub mod services;

pub use models::*;
pub use services::*;
