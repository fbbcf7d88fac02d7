use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::application::LanguageModelClient;
use crate::domain::ChatError;

pub const MOCK_RESPONSE_PREFIX: &str = "Mock Response: ";

/// Deterministic fake that echoes every prompt back behind a fixed tag.
///
/// Never fails. Prompts are recorded so callers can assert what was sent.
pub struct MockLanguageModel {
    prefix: String,
    invocations: Mutex<Vec<String>>,
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::with_prefix(MOCK_RESPONSE_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn invocations(&self) -> Vec<String> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for MockLanguageModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageModelClient for MockLanguageModel {
    async fn invoke(&self, prompt: &str) -> Result<String, ChatError> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        debug!("MockLanguageModel echoing {} byte prompt", prompt.len());
        Ok(format!("{}{}", self.prefix, prompt))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Fake whose every invocation fails with [`ChatError::Invocation`].
pub struct FailingLanguageModel {
    message: String,
    invocations: Mutex<usize>,
}

impl FailingLanguageModel {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            invocations: Mutex::new(0),
        }
    }

    pub fn invocation_count(&self) -> usize {
        *self.invocations.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LanguageModelClient for FailingLanguageModel {
    async fn invoke(&self, _prompt: &str) -> Result<String, ChatError> {
        *self.invocations.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Err(ChatError::invocation(self.message.clone()))
    }

    fn name(&self) -> &str {
        "failing-mock"
    }
}
