use std::sync::Arc;

use tracing::debug;

use crate::application::LanguageModelClient;
use crate::domain::{ChatError, PromptTemplate};

/// Prompt template composed with a client: format, invoke, trim.
pub struct ChatChain {
    client: Arc<dyn LanguageModelClient>,
    template: PromptTemplate,
}

impl ChatChain {
    pub fn new(client: Arc<dyn LanguageModelClient>, template: PromptTemplate) -> Self {
        Self { client, template }
    }

    /// Assemble a chain from raw template text.
    ///
    /// Fails with [`ChatError::Construction`] when the template is malformed.
    pub fn from_template(
        client: Arc<dyn LanguageModelClient>,
        template: &str,
    ) -> Result<Self, ChatError> {
        Ok(Self::new(client, PromptTemplate::new(template)?))
    }

    pub async fn respond(&self, input: &str) -> Result<String, ChatError> {
        let prompt = self.template.render(input);
        debug!("Sending {} byte prompt to {}", prompt.len(), self.client.name());

        let reply = self.client.invoke(&prompt).await?;
        Ok(reply.trim().to_string())
    }
}
