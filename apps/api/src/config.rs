use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::extraction::{ExtractorSettings, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::llm_client::{LlmSettings, Provider};

/// Application configuration loaded from environment variables.
/// Startup fails if the selected provider has no API key.
///
/// No `Debug`: `llm` carries the API key.
#[derive(Clone)]
pub struct Config {
    pub llm: LlmSettings,
    pub extractor: ExtractorSettings,
    /// Accepted for compatibility; responses are never cached.
    pub cache_responses: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. `from_env` passes the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match var("DEFAULT_PROVIDER") {
            Some(name) => name
                .parse::<Provider>()
                .context("DEFAULT_PROVIDER is invalid")?,
            None => Provider::default(),
        };

        let mut llm = LlmSettings::new(provider, var(provider.api_key_env()))
            .context("LLM provider is not configured")?;
        llm.base_url = var("LLM_BASE_URL");
        llm.timeout = parse_var::<u64>(var("LLM_TIMEOUT_SECS"), "LLM_TIMEOUT_SECS")?
            .map(Duration::from_secs);

        let extractor = ExtractorSettings {
            model: var(provider.model_env())
                .unwrap_or_else(|| provider.default_model().to_string()),
            temperature: parse_var(var("LLM_TEMPERATURE"), "LLM_TEMPERATURE")?
                .unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: parse_var(var("LLM_MAX_TOKENS"), "LLM_MAX_TOKENS")?
                .unwrap_or(DEFAULT_MAX_TOKENS),
        };

        Ok(Config {
            llm,
            extractor,
            cache_responses: var("CACHE_RESPONSES").map_or(Ok(false), |v| parse_flag(&v))?,
            port: parse_var(var("PORT"), "PORT")
                .context("PORT must be a valid port number")?
                .unwrap_or(8080),
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_var<T>(value: Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| anyhow!("{key}='{v}' is invalid: {e}"))
        })
        .transpose()
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("CACHE_RESPONSES='{other}' is not a boolean")),
    }
}
