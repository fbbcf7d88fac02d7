use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::LanguageModelClient;
use crate::domain::{ChatError, ChatbotConfig};

const COMPLETIONS_PATH: &str = "/completions";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Minimal subset of the completions response we care about.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

/// HTTP client for the OpenAI-compatible completions API served by LM Studio.
///
/// `base_url` already carries the API version prefix, e.g.
/// `http://localhost:1234/v1`; requests go to `{base_url}/completions`.
/// LM Studio ignores the bearer token but OpenAI-compatible servers expect one.
#[derive(Clone)]
pub struct OpenAiCompletionClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
    base_url: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAiCompletionClient {
    /// Build a client sampling at the configured chat temperature.
    pub fn new(config: &ChatbotConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                ChatError::construction(format!("OpenAiCompletionClient: failed to build HTTP client: {e}"))
            })?;

        let base_url = config.base_url().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            api_key: config.api_key().to_string(),
            model: config.model().to_string(),
            url: format!("{base_url}{COMPLETIONS_PATH}"),
            base_url,
            temperature: config.chat_temperature(),
            max_tokens: config.max_tokens(),
        })
    }

    /// Same server and connection pool, different sampling temperature.
    pub fn with_temperature(&self, temperature: f32) -> Self {
        Self {
            temperature,
            ..self.clone()
        }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }

    fn request<'a>(&'a self, prompt: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        }
    }

    fn first_choice(response: CompletionResponse) -> Result<String, ChatError> {
        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| ChatError::invocation("OpenAiCompletionClient: response had no choices"))
    }
}

#[async_trait]
impl LanguageModelClient for OpenAiCompletionClient {
    async fn invoke(&self, prompt: &str) -> Result<String, ChatError> {
        debug!(
            "POST {} (model={}, temperature={})",
            self.url, self.model, self.temperature
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ChatError::invocation(format!(
                        "OpenAiCompletionClient: server not reachable at {}: {e}",
                        self.base_url
                    ))
                } else {
                    ChatError::invocation(format!("OpenAiCompletionClient: request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAiCompletionClient: API returned {status}: {body}");
            return Err(ChatError::invocation(format!(
                "OpenAiCompletionClient: API returned {status}"
            )));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            ChatError::invocation(format!("OpenAiCompletionClient: failed to parse response: {e}"))
        })?;

        Self::first_choice(completion)
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}
