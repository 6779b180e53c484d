//! Generic text extraction: render a task template, make one completion
//! call, parse the reply into the task's result shape.
//!
//! `TextExtractor` holds configuration only and is cheap to clone; the
//! invoice and resume extractors wrap one by composition.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::llm_client::prompts::{render, JSON_ONLY_SYSTEM, PLAIN_TEXT_SYSTEM};
use crate::llm_client::{
    strip_json_fences, validate_sampling, Completer, CompletionRequest, Provider,
};

pub mod error;
pub mod handlers;
pub mod prompts;
pub mod types;

pub use error::ExtractError;
pub use types::{
    Classification, EntityMap, KeyInformation, Sentiment, SentimentAnalysis, SummaryLength,
    SummaryOptions, SummaryStyle, DEFAULT_ENTITY_TYPES,
};

use prompts::*;
use types::ClassificationReply;

pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
const CLASSIFY_MAX_TOKENS: u32 = 500;

/// Sampling configuration shared by every call an extractor makes.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ExtractorSettings {
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            model: provider.default_model().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Clone)]
pub struct TextExtractor {
    completer: Arc<dyn Completer>,
    settings: ExtractorSettings,
}

impl TextExtractor {
    pub fn new(
        completer: Arc<dyn Completer>,
        settings: ExtractorSettings,
    ) -> Result<Self, ExtractError> {
        if settings.model.trim().is_empty() {
            return Err(ExtractError::InvalidParameter(
                "model must not be empty".to_string(),
            ));
        }
        validate_sampling(settings.temperature, settings.max_tokens)
            .map_err(ExtractError::InvalidParameter)?;

        Ok(Self {
            completer,
            settings,
        })
    }

    pub fn settings(&self) -> &ExtractorSettings {
        &self.settings
    }

    pub fn provider(&self) -> Provider {
        self.completer.provider()
    }

    /// Extracts named entities grouped by category.
    ///
    /// The result has exactly one key per requested type (the default set
    /// when `entity_types` is `None` or empty).
    pub async fn extract_entities(
        &self,
        text: &str,
        entity_types: Option<&[String]>,
    ) -> Result<EntityMap, ExtractError> {
        require_text(text)?;

        let types = match entity_types {
            Some(types) if !types.is_empty() => normalize_labels(types, "entity_types")?,
            _ => DEFAULT_ENTITY_TYPES.iter().map(|t| t.to_string()).collect(),
        };

        let prompt = render(
            ENTITIES_PROMPT_TEMPLATE,
            &[("entity_types", &types.join(", ")), ("text", text)],
        );
        let reply: Map<String, Value> = self.complete_json(self.json_request(prompt)).await?;

        let entities = types
            .into_iter()
            .map(|t| {
                let values = lookup(&reply, &t).map(string_list).unwrap_or_default();
                (t, values)
            })
            .collect();

        Ok(entities)
    }

    /// Summarizes `text`; returns the completion text as-is (trimmed).
    pub async fn summarize(
        &self,
        text: &str,
        options: &SummaryOptions,
    ) -> Result<String, ExtractError> {
        require_text(text)?;

        let focus = options
            .focus
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(|f| format!("\nFocus particularly on: {f}"))
            .unwrap_or_default();

        let prompt = render(
            SUMMARY_PROMPT_TEMPLATE,
            &[
                ("length", options.length.guideline()),
                ("style", options.style.instruction()),
                ("focus", &focus),
                ("text", text),
            ],
        );

        let summary = self.complete_text(self.text_request(prompt)).await?;
        Ok(summary.trim().to_string())
    }

    pub async fn analyze_sentiment(&self, text: &str) -> Result<SentimentAnalysis, ExtractError> {
        require_text(text)?;

        let prompt = render(SENTIMENT_PROMPT_TEMPLATE, &[("text", text)]);
        let mut analysis: SentimentAnalysis =
            self.complete_record(self.json_request(prompt)).await?;
        analysis.confidence = analysis.confidence.clamp(0.0, 1.0);

        Ok(analysis)
    }

    /// Extracts data shaped by a caller-supplied schema.
    ///
    /// `schema` must be a non-empty JSON object mapping field names to type
    /// descriptions. The result holds exactly the schema's top-level keys;
    /// fields the model did not return are `null`.
    pub async fn extract_structured_data(
        &self,
        text: &str,
        schema: &Value,
    ) -> Result<Map<String, Value>, ExtractError> {
        self.extract_structured_with(text, schema, None).await
    }

    /// Structured extraction deserialized into `T`. Null fields are dropped
    /// first so `#[serde(default)]` collections come back empty.
    pub async fn extract_structured_as<T: DeserializeOwned>(
        &self,
        text: &str,
        schema: &Value,
    ) -> Result<T, ExtractError> {
        let data = self.extract_structured_data(text, schema).await?;
        from_data(data)
    }

    pub(crate) async fn extract_structured_with(
        &self,
        text: &str,
        schema: &Value,
        max_tokens: Option<u32>,
    ) -> Result<Map<String, Value>, ExtractError> {
        require_text(text)?;

        let fields = match schema.as_object() {
            Some(fields) if !fields.is_empty() => fields,
            _ => {
                return Err(ExtractError::InvalidParameter(
                    "schema must be a non-empty JSON object".to_string(),
                ))
            }
        };

        let schema_json = serde_json::to_string_pretty(schema)
            .map_err(|e| ExtractError::InvalidParameter(format!("schema: {e}")))?;
        let prompt = render(
            STRUCTURED_PROMPT_TEMPLATE,
            &[("schema", &schema_json), ("text", text)],
        );

        let mut request = self.json_request(prompt);
        if let Some(max_tokens) = max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        let mut reply: Map<String, Value> = self.complete_json(request).await?;

        let data = fields
            .keys()
            .map(|key| (key.clone(), reply.remove(key).unwrap_or(Value::Null)))
            .collect();

        Ok(data)
    }

    /// Classifies `text` into the closed `categories` set.
    ///
    /// Single-label results are always a member of `categories`; multi-label
    /// results are a (possibly empty) subset, in the model's order.
    pub async fn classify_text(
        &self,
        text: &str,
        categories: &[String],
        multi_label: bool,
    ) -> Result<Classification, ExtractError> {
        require_text(text)?;
        let categories = normalize_labels(categories, "categories")?;

        let (label_instruction, answer_format) = if multi_label {
            (MULTI_LABEL_INSTRUCTION, MULTI_LABEL_FORMAT)
        } else {
            (SINGLE_LABEL_INSTRUCTION, SINGLE_LABEL_FORMAT)
        };

        let prompt = render(
            CLASSIFY_PROMPT_TEMPLATE,
            &[
                ("categories", &categories.join(", ")),
                ("label_instruction", label_instruction),
                ("text", text),
                ("answer_format", answer_format),
            ],
        );
        let request = self.json_request(prompt).with_max_tokens(CLASSIFY_MAX_TOKENS);
        let raw = self.complete_text(request).await?;
        let reply: ClassificationReply = parse_json_reply(&raw)?;

        if multi_label {
            let named = reply
                .categories
                .or_else(|| reply.category.map(|c| vec![c]))
                .unwrap_or_default();

            let mut seen = HashSet::new();
            let picked = named
                .iter()
                .filter_map(|c| canonical_category(&categories, c))
                .filter(|c| seen.insert(c.clone()))
                .collect::<Vec<_>>();

            if picked.len() < named.len() {
                debug!(
                    returned = named.len(),
                    kept = picked.len(),
                    "dropped categories outside the allowed set"
                );
            }
            return Ok(Classification::Multi(picked));
        }

        let named = reply
            .category
            .or_else(|| reply.categories.and_then(|cs| cs.into_iter().next()))
            .ok_or_else(|| ExtractError::parse("reply has no \"category\" field", raw.as_str()))?;

        canonical_category(&categories, &named)
            .map(Classification::Single)
            .ok_or_else(|| {
                ExtractError::parse(
                    format!("category '{named}' is not one of the allowed categories"),
                    raw.as_str(),
                )
            })
    }

    /// Extracts one value (or list of values) per requested information type.
    /// Types the text does not contain are omitted from the result.
    pub async fn extract_key_information(
        &self,
        text: &str,
        information_types: &[String],
    ) -> Result<BTreeMap<String, KeyInformation>, ExtractError> {
        require_text(text)?;
        let types = normalize_labels(information_types, "information_types")?;

        let prompt = render(
            KEY_INFORMATION_PROMPT_TEMPLATE,
            &[("information_types", &types.join(", ")), ("text", text)],
        );
        let reply: Map<String, Value> = self.complete_json(self.json_request(prompt)).await?;

        let info = types
            .into_iter()
            .filter_map(|t| {
                let value = lookup(&reply, &t).and_then(key_information)?;
                Some((t, value))
            })
            .collect();

        Ok(info)
    }

    // ────────────────────────────────────────────────────────────────────
    // Call plumbing shared with the domain extractors
    // ────────────────────────────────────────────────────────────────────

    pub(crate) fn json_request(&self, prompt: String) -> CompletionRequest {
        self.request(prompt, JSON_ONLY_SYSTEM, true)
    }

    pub(crate) fn text_request(&self, prompt: String) -> CompletionRequest {
        self.request(prompt, PLAIN_TEXT_SYSTEM, false)
    }

    fn request(&self, prompt: String, system: &str, json_mode: bool) -> CompletionRequest {
        CompletionRequest {
            prompt,
            system: Some(system.to_string()),
            model: self.settings.model.clone(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            json_mode,
        }
    }

    pub(crate) async fn complete_text(
        &self,
        request: CompletionRequest,
    ) -> Result<String, ExtractError> {
        request.validate().map_err(ExtractError::InvalidParameter)?;

        debug!(
            provider = %self.completer.provider(),
            model = %request.model,
            prompt_chars = request.prompt.len(),
            "sending completion request"
        );

        Ok(self.completer.complete(&request).await?)
    }

    pub(crate) async fn complete_json<T: DeserializeOwned>(
        &self,
        request: CompletionRequest,
    ) -> Result<T, ExtractError> {
        let raw = self.complete_text(request).await?;
        parse_json_reply(&raw)
    }

    /// Like `complete_json`, but drops null members before deserializing so
    /// records with `#[serde(default)]` fields tolerate sparse replies.
    pub(crate) async fn complete_record<T: DeserializeOwned>(
        &self,
        request: CompletionRequest,
    ) -> Result<T, ExtractError> {
        let raw = self.complete_text(request).await?;
        let value: Value = parse_json_reply(&raw)?;
        serde_json::from_value(strip_nulls(value))
            .map_err(|e| ExtractError::parse(e.to_string(), raw.as_str()))
    }
}

/// Parses a JSON reply, falling back to the body of a markdown code fence.
/// Anything else is a `Parse` error carrying the raw reply.
pub fn parse_json_reply<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractError> {
    match serde_json::from_str(raw.trim()) {
        Ok(value) => Ok(value),
        Err(first) => {
            let stripped = strip_json_fences(raw);
            if stripped.len() == raw.trim().len() {
                return Err(ExtractError::parse(first.to_string(), raw));
            }
            serde_json::from_str(stripped).map_err(|e| ExtractError::parse(e.to_string(), raw))
        }
    }
}

/// Deserializes extracted data into a typed record, ignoring null fields.
pub(crate) fn from_data<T: DeserializeOwned>(data: Map<String, Value>) -> Result<T, ExtractError> {
    let value = strip_nulls(Value::Object(data));
    serde_json::from_value(value.clone())
        .map_err(|e| ExtractError::parse(e.to_string(), value.to_string()))
}

/// Removes `null` object members at every depth.
pub(crate) fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(strip_nulls)
                .collect(),
        ),
        other => other,
    }
}

pub(crate) fn require_text(text: &str) -> Result<(), ExtractError> {
    if text.trim().is_empty() {
        return Err(ExtractError::InvalidParameter(
            "text must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Trims labels and rejects empty, blank or duplicate (case-insensitive) entries.
fn normalize_labels(labels: &[String], field: &str) -> Result<Vec<String>, ExtractError> {
    if labels.is_empty() {
        return Err(ExtractError::InvalidParameter(format!(
            "{field} must not be empty"
        )));
    }

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if label.is_empty() {
            return Err(ExtractError::InvalidParameter(format!(
                "{field} must not contain blank entries"
            )));
        }
        if !seen.insert(label.to_lowercase()) {
            return Err(ExtractError::InvalidParameter(format!(
                "{field} contains duplicate entry '{label}'"
            )));
        }
        out.push(label.to_string());
    }
    Ok(out)
}

fn canonical_category(categories: &[String], named: &str) -> Option<String> {
    let named = named.trim();
    categories
        .iter()
        .find(|c| c.eq_ignore_ascii_case(named))
        .cloned()
}

/// Finds `key` in the reply, tolerating case differences.
fn lookup<'a>(reply: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    reply.get(key).or_else(|| {
        reply
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_string).collect(),
        other => scalar_string(other).into_iter().collect(),
    }
}

fn key_information(value: &Value) -> Option<KeyInformation> {
    match value {
        Value::Null => None,
        Value::Array(_) => Some(KeyInformation::List(string_list(value))),
        Value::Object(_) => Some(KeyInformation::Text(value.to_string())),
        scalar => scalar_string(scalar).map(KeyInformation::Text),
    }
}
