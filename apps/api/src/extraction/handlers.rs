//! Axum route handlers for the generic extraction API.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::extraction::{
    Classification, EntityMap, KeyInformation, SentimentAnalysis, SummaryLength, SummaryOptions,
    SummaryStyle,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EntitiesRequest {
    pub text: String,
    pub entity_types: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct EntitiesResponse {
    pub entities: EntityMap,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub text: String,
    #[serde(default)]
    pub length: SummaryLength,
    #[serde(default)]
    pub style: SummaryStyle,
    pub focus: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct StructuredRequest {
    pub text: String,
    pub schema: Value,
}

#[derive(Debug, Serialize)]
pub struct StructuredResponse {
    pub data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
    pub categories: Vec<String>,
    #[serde(default)]
    pub multi_label: bool,
}

/// `{"category": ...}` for single-label, `{"categories": [...]}` for multi-label.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ClassifyResponse {
    Single { category: String },
    Multi { categories: Vec<String> },
}

impl From<Classification> for ClassifyResponse {
    fn from(c: Classification) -> Self {
        match c {
            Classification::Single(category) => ClassifyResponse::Single { category },
            Classification::Multi(categories) => ClassifyResponse::Multi { categories },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct KeyInformationRequest {
    pub text: String,
    pub information_types: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct KeyInformationResponse {
    pub information: BTreeMap<String, KeyInformation>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/extract/entities
pub async fn handle_entities(
    State(state): State<AppState>,
    Json(req): Json<EntitiesRequest>,
) -> Result<Json<EntitiesResponse>, AppError> {
    let entities = state
        .text
        .extract_entities(&req.text, req.entity_types.as_deref())
        .await?;
    Ok(Json(EntitiesResponse { entities }))
}

/// POST /api/v1/extract/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Json(req): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let options = SummaryOptions {
        length: req.length,
        style: req.style,
        focus: req.focus,
    };
    let summary = state.text.summarize(&req.text, &options).await?;
    Ok(Json(SummaryResponse { summary }))
}

/// POST /api/v1/extract/sentiment
pub async fn handle_sentiment(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<SentimentAnalysis>, AppError> {
    Ok(Json(state.text.analyze_sentiment(&req.text).await?))
}

/// POST /api/v1/extract/structured
pub async fn handle_structured(
    State(state): State<AppState>,
    Json(req): Json<StructuredRequest>,
) -> Result<Json<StructuredResponse>, AppError> {
    let data = state
        .text
        .extract_structured_data(&req.text, &req.schema)
        .await?;
    Ok(Json(StructuredResponse { data }))
}

/// POST /api/v1/extract/classify
pub async fn handle_classify(
    State(state): State<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let result = state
        .text
        .classify_text(&req.text, &req.categories, req.multi_label)
        .await?;
    Ok(Json(result.into()))
}

/// POST /api/v1/extract/key-information
pub async fn handle_key_information(
    State(state): State<AppState>,
    Json(req): Json<KeyInformationRequest>,
) -> Result<Json<KeyInformationResponse>, AppError> {
    let information = state
        .text
        .extract_key_information(&req.text, &req.information_types)
        .await?;
    Ok(Json(KeyInformationResponse { information }))
}
