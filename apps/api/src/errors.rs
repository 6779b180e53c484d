use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractError;
use crate::llm_client::LlmError;
use crate::text_utils::ChunkError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited by LLM provider")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM reply could not be parsed: {0}")]
    LlmParse(String),
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::InvalidParameter(msg) => AppError::Validation(msg),
            ExtractError::Transport(LlmError::RateLimited { retry_after_secs }) => {
                AppError::RateLimited { retry_after_secs }
            }
            ExtractError::Transport(e) => AppError::Llm(e.to_string()),
            ExtractError::Parse {
                message,
                raw_response,
            } => AppError::LlmParse(format!("{message} (reply: {raw_response:?})")),
        }
    }
}

impl From<ChunkError> for AppError {
    fn from(err: ChunkError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::RateLimited { retry_after_secs } => {
                tracing::warn!("LLM provider rate limit hit (retry after {retry_after_secs:?}s)");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "RATE_LIMITED",
                    "The LLM provider is rate limiting requests".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The LLM provider request failed".to_string(),
                )
            }
            AppError::LlmParse(msg) => {
                tracing::error!("LLM parse error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_PARSE_ERROR",
                    "The LLM reply was not valid JSON for this task".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
