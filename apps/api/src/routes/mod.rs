pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{extraction, invoice, resume, text_utils};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generic extraction
        .route(
            "/api/v1/extract/entities",
            post(extraction::handlers::handle_entities),
        )
        .route(
            "/api/v1/extract/summary",
            post(extraction::handlers::handle_summary),
        )
        .route(
            "/api/v1/extract/sentiment",
            post(extraction::handlers::handle_sentiment),
        )
        .route(
            "/api/v1/extract/structured",
            post(extraction::handlers::handle_structured),
        )
        .route(
            "/api/v1/extract/classify",
            post(extraction::handlers::handle_classify),
        )
        .route(
            "/api/v1/extract/key-information",
            post(extraction::handlers::handle_key_information),
        )
        // Invoices
        .route(
            "/api/v1/invoices/extract",
            post(invoice::handlers::handle_extract),
        )
        .route(
            "/api/v1/invoices/line-items",
            post(invoice::handlers::handle_line_items),
        )
        .route(
            "/api/v1/invoices/validate",
            post(invoice::handlers::handle_validate),
        )
        .route(
            "/api/v1/invoices/extract-and-validate",
            post(invoice::handlers::handle_extract_and_validate),
        )
        // Resumes
        .route(
            "/api/v1/resumes/extract",
            post(resume::handlers::handle_extract),
        )
        .route(
            "/api/v1/resumes/contact",
            post(resume::handlers::handle_contact),
        )
        .route("/api/v1/resumes/skills", post(resume::handlers::handle_skills))
        .route("/api/v1/resumes/match", post(resume::handlers::handle_match))
        .route(
            "/api/v1/resumes/summary",
            post(resume::handlers::handle_summary),
        )
        // Local text utilities
        .route(
            "/api/v1/text/analyze",
            post(text_utils::handlers::handle_analyze),
        )
        .route("/api/v1/text/chunk", post(text_utils::handlers::handle_chunk))
        .with_state(state)
}
