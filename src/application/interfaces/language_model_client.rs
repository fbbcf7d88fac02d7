use async_trait::async_trait;

use crate::domain::ChatError;

/// Sends a single text prompt to a language model and returns its completion.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. The probe, chain and session only ever see this trait, so a fake
/// can stand in for the network-backed client.
#[async_trait]
pub trait LanguageModelClient: Send + Sync {
    /// Complete `prompt`, returning the raw (untrimmed) model text.
    async fn invoke(&self, prompt: &str) -> Result<String, ChatError>;

    /// Short identifier used in log lines.
    fn name(&self) -> &str;
}
