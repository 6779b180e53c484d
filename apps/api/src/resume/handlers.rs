//! Axum route handlers for the Resume API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::resume::{ContactInfo, MatchReport, ResumeRecord, SkillSet};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResumeTextRequest {
    pub text: String,
}

/// Either `resume_text` or pre-extracted `skills` must be present. When both
/// are sent the skills win and the resume is not re-parsed.
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: Option<String>,
    pub skills: Option<SkillSet>,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub resume_data: ResumeRecord,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(req): Json<ResumeTextRequest>,
) -> Result<Json<ResumeRecord>, AppError> {
    Ok(Json(state.resumes.extract(&req.text).await?))
}

/// POST /api/v1/resumes/contact
pub async fn handle_contact(
    State(state): State<AppState>,
    Json(req): Json<ResumeTextRequest>,
) -> Result<Json<ContactInfo>, AppError> {
    Ok(Json(state.resumes.extract_contact_info(&req.text).await?))
}

/// POST /api/v1/resumes/skills
pub async fn handle_skills(
    State(state): State<AppState>,
    Json(req): Json<ResumeTextRequest>,
) -> Result<Json<SkillSet>, AppError> {
    Ok(Json(state.resumes.extract_skills(&req.text).await?))
}

/// POST /api/v1/resumes/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchReport>, AppError> {
    let report = match (req.skills, req.resume_text) {
        (Some(skills), _) => {
            state
                .resumes
                .match_skills(&skills, &req.job_description)
                .await?
        }
        (None, Some(resume_text)) => {
            state
                .resumes
                .match_job_description(&resume_text, &req.job_description)
                .await?
        }
        (None, None) => {
            return Err(AppError::Validation(
                "either resume_text or skills is required".to_string(),
            ))
        }
    };

    Ok(Json(report))
}

/// POST /api/v1/resumes/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Json(req): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let summary = state.resumes.generate_summary(&req.resume_data).await?;
    Ok(Json(SummaryResponse { summary }))
}
