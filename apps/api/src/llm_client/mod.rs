/// LLM Client: the single point of entry for every hosted completion call.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// Extractors hold an `Arc<dyn Completer>` and never see provider envelopes.
///
/// One request per `complete` call. Failures (transport, auth, rate limit)
/// surface unchanged; callers decide whether to retry.
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod anthropic;
pub mod openai;
pub mod prompts;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-sonnet-20240229";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by provider (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Invalid completion request: {0}")]
    InvalidRequest(String),
}

/// A single completion call. `model`, `temperature` and `max_tokens` travel
/// with every request so one client can serve differently tuned extractors.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object reply where it supports that natively.
    pub json_mode: bool,
}

impl CompletionRequest {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Checks the call contract shared by every provider:
    /// non-empty prompt and model, temperature in [0, 1], positive max_tokens.
    pub fn validate(&self) -> Result<(), String> {
        if self.prompt.trim().is_empty() {
            return Err("prompt must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        validate_sampling(self.temperature, self.max_tokens)
    }
}

/// Shared range checks for temperature and max_tokens.
pub fn validate_sampling(temperature: f32, max_tokens: u32) -> Result<(), String> {
    if !(0.0..=1.0).contains(&temperature) {
        return Err(format!(
            "temperature must be between 0.0 and 1.0, got {temperature}"
        ));
    }
    if max_tokens == 0 {
        return Err("max_tokens must be a positive integer".to_string());
    }
    Ok(())
}

/// The completion capability every extractor depends on.
///
/// Implementations unwrap their provider's response envelope and return the
/// reply text only.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Short provider label for logs.
    fn provider(&self) -> Provider;
}

/// Supported hosted completion services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => DEFAULT_OPENAI_MODEL,
            Provider::Anthropic => DEFAULT_ANTHROPIC_MODEL,
        }
    }

    /// Environment variable consulted when no api key is configured explicitly.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn model_env(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_MODEL",
            Provider::Anthropic => "ANTHROPIC_MODEL",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(LlmError::InvalidRequest(format!(
                "Unsupported provider: {other}. Use 'openai' or 'anthropic'."
            ))),
        }
    }
}

/// Connection settings for a provider client.
///
/// NOTE: no `Debug` derive; `api_key` must never reach the logs.
#[derive(Clone)]
pub struct LlmSettings {
    pub provider: Provider,
    pub api_key: String,
    /// Overrides the provider's public endpoint (proxies, test servers).
    pub base_url: Option<String>,
    /// Passed straight to the HTTP client; `None` means no client-side timeout.
    pub timeout: Option<Duration>,
}

impl LlmSettings {
    /// Settings for `provider` with exactly the given key. A missing or blank
    /// key is an error.
    pub fn new(provider: Provider, api_key: Option<String>) -> Result<Self, LlmError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| missing_key(provider))?;

        Ok(Self {
            provider,
            api_key,
            base_url: None,
            timeout: None,
        })
    }

    /// Like `new`, falling back to the provider's api key environment variable.
    pub fn from_env(provider: Provider, api_key: Option<String>) -> Result<Self, LlmError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(provider.api_key_env()).ok());
        Self::new(provider, api_key)
    }
}

fn missing_key(provider: Provider) -> LlmError {
    LlmError::InvalidRequest(format!(
        "{provider} API key is required (set {})",
        provider.api_key_env()
    ))
}

/// Builds the configured provider client behind the `Completer` capability.
pub fn build_completer(settings: &LlmSettings) -> Result<Arc<dyn Completer>, LlmError> {
    if settings.api_key.trim().is_empty() {
        return Err(missing_key(settings.provider));
    }

    let completer: Arc<dyn Completer> = match settings.provider {
        Provider::OpenAi => {
            let mut client = OpenAiClient::new(settings.api_key.clone(), settings.timeout)?;
            if let Some(url) = &settings.base_url {
                client = client.with_base_url(url.clone());
            }
            Arc::new(client)
        }
        Provider::Anthropic => {
            let mut client = AnthropicClient::new(settings.api_key.clone(), settings.timeout)?;
            if let Some(url) = &settings.base_url {
                client = client.with_base_url(url.clone());
            }
            Arc::new(client)
        }
    };

    Ok(completer)
}

/// Builds the shared reqwest client. The timeout is forwarded untouched.
pub(crate) fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(LlmError::Http)
}

/// Reads a numeric `retry-after` header, if the provider sent one.
pub(crate) fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// A fenced block surrounded by prose is extracted as well.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();

    let (open, skip) = if let Some(pos) = text.find("```json") {
        (pos, "```json".len())
    } else if let Some(pos) = text.find("```") {
        (pos, "```".len())
    } else {
        return text;
    };

    let body = &text[open + skip..];
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            prompt: "Summarize this".to_string(),
            system: None,
            model: DEFAULT_OPENAI_MODEL.to_string(),
            temperature: 0.1,
            max_tokens: 2000,
            json_mode: false,
        }
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_inside_prose() {
        let input = "Here you go:\n```json\n[1, 2]\n```\nLet me know!";
        assert_eq!(strip_json_fences(input), "[1, 2]");
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_blank_prompt_rejected() {
        let mut req = request();
        req.prompt = "   ".to_string();
        assert!(req.validate().unwrap_err().contains("prompt"));
    }

    #[test]
    fn test_temperature_out_of_range_rejected() {
        let mut req = request();
        req.temperature = 1.5;
        assert!(req.validate().unwrap_err().contains("temperature"));
        req.temperature = -0.1;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let mut req = request();
        req.max_tokens = 0;
        assert!(req.validate().unwrap_err().contains("max_tokens"));
    }

    #[test]
    fn test_provider_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!(" anthropic ".parse::<Provider>().unwrap(), Provider::Anthropic);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = "invalid_provider".parse::<Provider>().unwrap_err();
        assert!(matches!(err, LlmError::InvalidRequest(_)));
    }

    #[test]
    fn test_default_models() {
        assert_eq!(Provider::OpenAi.default_model(), "gpt-4-turbo-preview");
        assert_eq!(Provider::Anthropic.default_model(), "claude-3-sonnet-20240229");
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let settings = LlmSettings::from_env(Provider::Anthropic, Some("sk-test".to_string()))
            .unwrap();
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.provider, Provider::Anthropic);
    }

    #[test]
    fn test_new_rejects_blank_key() {
        assert!(LlmSettings::new(Provider::OpenAi, None).is_err());
        assert!(LlmSettings::new(Provider::OpenAi, Some("   ".to_string())).is_err());
    }

    #[test]
    fn test_build_completer_requires_key() {
        let settings = LlmSettings {
            provider: Provider::OpenAi,
            api_key: String::new(),
            base_url: None,
            timeout: None,
        };
        assert!(build_completer(&settings).is_err());
    }

    #[test]
    fn test_build_completer_selects_provider() {
        let settings = LlmSettings {
            provider: Provider::Anthropic,
            api_key: "sk-test".to_string(),
            base_url: Some("http://localhost:9".to_string()),
            timeout: Some(Duration::from_secs(5)),
        };
        let completer = build_completer(&settings).unwrap();
        assert_eq!(completer.provider(), Provider::Anthropic);
    }
}
