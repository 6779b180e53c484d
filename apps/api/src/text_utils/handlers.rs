//! Axum route handlers for the local text utilities. No completion calls.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::text_utils::{
    chunk_text, extract_emails, extract_phones, extract_urls, find_keywords, readability_score,
    ReadabilityReport,
};

const DEFAULT_TOP_KEYWORDS: usize = 10;
const DEFAULT_MAX_CHUNK_SIZE: usize = 4000;
const DEFAULT_CHUNK_OVERLAP: usize = 200;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub top_keywords: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub readability: ReadabilityReport,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub urls: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkRequest {
    pub text: String,
    pub max_chunk_size: Option<usize>,
    pub overlap: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ChunkResponse {
    pub chunks: Vec<String>,
}

/// POST /api/v1/text/analyze
pub async fn handle_analyze(Json(req): Json<AnalyzeRequest>) -> Json<AnalyzeResponse> {
    let top_n = req.top_keywords.unwrap_or(DEFAULT_TOP_KEYWORDS);
    Json(AnalyzeResponse {
        readability: readability_score(&req.text),
        emails: extract_emails(&req.text),
        phones: extract_phones(&req.text),
        urls: extract_urls(&req.text),
        keywords: find_keywords(&req.text, top_n),
    })
}

/// POST /api/v1/text/chunk
///
/// Without an explicit `overlap`, the default is capped at half of
/// `max_chunk_size` so small chunk sizes stay valid. An explicit overlap is
/// used as given.
pub async fn handle_chunk(Json(req): Json<ChunkRequest>) -> Result<Json<ChunkResponse>, AppError> {
    let max_chunk_size = req.max_chunk_size.unwrap_or(DEFAULT_MAX_CHUNK_SIZE);
    let overlap = req
        .overlap
        .unwrap_or_else(|| DEFAULT_CHUNK_OVERLAP.min(max_chunk_size / 2));

    let chunks = chunk_text(&req.text, max_chunk_size, overlap)?
        .map(str::to_string)
        .collect();

    Ok(Json(ChunkResponse { chunks }))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn chunk(
        text: &str,
        max_chunk_size: Option<usize>,
        overlap: Option<usize>,
    ) -> Vec<String> {
        let req = ChunkRequest {
            text: text.to_string(),
            max_chunk_size,
            overlap,
        };
        handle_chunk(Json(req)).await.unwrap().0.chunks
    }

    #[tokio::test]
    async fn test_small_chunk_size_caps_default_overlap() {
        // Overlap defaults to 2 here, not 200.
        assert_eq!(
            chunk("abcdefghij", Some(4), None).await,
            vec!["abcd", "cdef", "efgh", "ghij"]
        );
        assert_eq!(chunk("abc", Some(1), None).await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_explicit_overlap_is_still_validated() {
        let req = ChunkRequest {
            text: "abcdef".to_string(),
            max_chunk_size: Some(4),
            overlap: Some(4),
        };
        assert!(handle_chunk(Json(req)).await.is_err());
    }

    #[tokio::test]
    async fn test_defaults_keep_short_text_whole() {
        assert_eq!(chunk("Short text.", None, None).await, vec!["Short text."]);
    }
}
