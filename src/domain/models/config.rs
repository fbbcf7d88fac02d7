use std::time::Duration;

use crate::domain::ChatError;

pub const BASE_URL_VAR: &str = "LM_STUDIO_BASE_URL";
pub const API_KEY_VAR: &str = "LM_STUDIO_API_KEY";
pub const MODEL_VAR: &str = "LM_STUDIO_MODEL";
pub const TEMPERATURE_VAR: &str = "LM_STUDIO_TEMPERATURE";
pub const MAX_TOKENS_VAR: &str = "LM_STUDIO_MAX_TOKENS";
pub const TIMEOUT_VAR: &str = "LM_STUDIO_TIMEOUT_SECS";

/// LM Studio accepts any key, but OpenAI-compatible clients must send one.
pub const DEFAULT_API_KEY: &str = "lm-studio";
/// LM Studio answers with whichever model is currently loaded.
pub const DEFAULT_MODEL: &str = "local-model";
pub const DEFAULT_CHAT_TEMPERATURE: f32 = 0.7;
/// Near-deterministic sampling for the startup probe.
pub const PROBE_TEMPERATURE: f32 = 0.01;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings for reaching the model server, built once at process entry.
///
/// | Variable                 | Default       |
/// |--------------------------|---------------|
/// | `LM_STUDIO_BASE_URL`     | required      |
/// | `LM_STUDIO_API_KEY`      | `lm-studio`   |
/// | `LM_STUDIO_MODEL`        | `local-model` |
/// | `LM_STUDIO_TEMPERATURE`  | `0.7`         |
/// | `LM_STUDIO_MAX_TOKENS`   | unset         |
/// | `LM_STUDIO_TIMEOUT_SECS` | `120`         |
#[derive(Debug, Clone, PartialEq)]
pub struct ChatbotConfig {
    base_url: String,
    api_key: String,
    model: String,
    chat_temperature: f32,
    probe_temperature: f32,
    max_tokens: Option<u32>,
    request_timeout: Duration,
}

impl ChatbotConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: DEFAULT_API_KEY.to_string(),
            model: DEFAULT_MODEL.to_string(),
            chat_temperature: DEFAULT_CHAT_TEMPERATURE,
            probe_temperature: PROBE_TEMPERATURE,
            max_tokens: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self, ChatError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = get(BASE_URL_VAR).ok_or_else(|| {
            ChatError::configuration(format!(
                "the {BASE_URL_VAR} environment variable is not set. \
                 Add {BASE_URL_VAR}=http://localhost:1234/v1 to your .env file"
            ))
        })?;

        let mut config = Self::new(base_url);

        if let Some(key) = get(API_KEY_VAR) {
            config.api_key = key;
        }
        if let Some(model) = get(MODEL_VAR) {
            config.model = model;
        }
        if let Some(raw) = get(TEMPERATURE_VAR) {
            config.chat_temperature = parse_var(TEMPERATURE_VAR, &raw)?;
        }
        if let Some(raw) = get(MAX_TOKENS_VAR) {
            config.max_tokens = Some(parse_var(MAX_TOKENS_VAR, &raw)?);
        }
        if let Some(raw) = get(TIMEOUT_VAR) {
            config.request_timeout = Duration::from_secs(parse_var(TIMEOUT_VAR, &raw)?);
        }

        Ok(config)
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn chat_temperature(&self) -> f32 {
        self.chat_temperature
    }

    pub fn probe_temperature(&self) -> f32 {
        self.probe_temperature
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ChatError> {
    raw.parse()
        .map_err(|_| ChatError::configuration(format!("invalid value for {key}: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_base_url_is_a_configuration_error() {
        let err = ChatbotConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
        assert!(err.to_string().contains(BASE_URL_VAR));
    }

    #[test]
    fn blank_base_url_counts_as_missing() {
        let err = ChatbotConfig::from_lookup(lookup(&[(BASE_URL_VAR, "   ")])).unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }

    #[test]
    fn defaults_apply_when_only_base_url_is_set() {
        let config =
            ChatbotConfig::from_lookup(lookup(&[(BASE_URL_VAR, "http://localhost:1234/v1")]))
                .unwrap();
        assert_eq!(config.base_url(), "http://localhost:1234/v1");
        assert_eq!(config.api_key(), DEFAULT_API_KEY);
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.chat_temperature(), DEFAULT_CHAT_TEMPERATURE);
        assert_eq!(config.probe_temperature(), PROBE_TEMPERATURE);
        assert_eq!(config.max_tokens(), None);
        assert_eq!(config.request_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn optional_overrides_are_parsed() {
        let config = ChatbotConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://10.0.0.2:1234/v1"),
            (API_KEY_VAR, "secret"),
            (MODEL_VAR, "llama-3.2-3b-instruct"),
            (TEMPERATURE_VAR, "0.2"),
            (MAX_TOKENS_VAR, "256"),
            (TIMEOUT_VAR, "15"),
        ]))
        .unwrap();
        assert_eq!(config.api_key(), "secret");
        assert_eq!(config.model(), "llama-3.2-3b-instruct");
        assert_eq!(config.chat_temperature(), 0.2);
        assert_eq!(config.max_tokens(), Some(256));
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn malformed_override_is_rejected() {
        let err = ChatbotConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://localhost:1234/v1"),
            (MAX_TOKENS_VAR, "lots"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(MAX_TOKENS_VAR));
    }
}
