//! Resume parsing and job matching.
//!
//! Matching is split in two: the model lists the job's skills and writes the
//! narrative, while the score and the matching/partial/missing sets are
//! computed locally by `matching::score_skill_overlap`.

use serde::Deserialize;
use tracing::debug;

use crate::extraction::{require_text, ExtractError, TextExtractor};
use crate::llm_client::prompts::render;

pub mod handlers;
pub mod matching;
pub mod models;
pub mod prompts;

pub use matching::{score_skill_overlap, SkillOverlap};
pub use models::{
    Certification, ContactInfo, Education, LanguageSkill, MatchReport, Project, ResumeRecord,
    SkillSet, WorkExperience,
};

use prompts::*;

const CONTACT_MAX_TOKENS: u32 = 500;
const SKILLS_MAX_TOKENS: u32 = 1000;
const MATCH_MAX_TOKENS: u32 = 1500;
const SUMMARY_TEMPERATURE: f32 = 0.3;
const SUMMARY_MAX_TOKENS: u32 = 300;

#[derive(Deserialize)]
struct JobSkillsReply {
    #[serde(default, alias = "skills")]
    required_skills: Vec<String>,
}

#[derive(Default, Deserialize)]
struct MatchNarrative {
    #[serde(default)]
    relevant_experience: Vec<String>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    gaps: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    summary: String,
}

#[derive(Clone)]
pub struct ResumeExtractor {
    extractor: TextExtractor,
}

impl ResumeExtractor {
    pub fn new(extractor: TextExtractor) -> Self {
        Self { extractor }
    }

    pub async fn extract(&self, resume_text: &str) -> Result<ResumeRecord, ExtractError> {
        self.extractor
            .extract_structured_as(resume_text, &resume_schema())
            .await
    }

    pub async fn extract_contact_info(
        &self,
        resume_text: &str,
    ) -> Result<ContactInfo, ExtractError> {
        require_text(resume_text)?;

        let prompt = render(CONTACT_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);
        let request = self
            .extractor
            .json_request(prompt)
            .with_max_tokens(CONTACT_MAX_TOKENS);
        self.extractor.complete_record(request).await
    }

    pub async fn extract_skills(&self, resume_text: &str) -> Result<SkillSet, ExtractError> {
        require_text(resume_text)?;

        let prompt = render(SKILLS_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);
        let request = self
            .extractor
            .json_request(prompt)
            .with_max_tokens(SKILLS_MAX_TOKENS);
        self.extractor.complete_record(request).await
    }

    /// Matches raw resume text against a job description. Three completion
    /// calls: resume skills, job skills, narrative.
    pub async fn match_job_description(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<MatchReport, ExtractError> {
        require_text(job_description)?;
        let skills = self.extract_skills(resume_text).await?;
        let candidate = format!("Resume:\n{resume_text}");
        self.build_match_report(&skills, job_description, &candidate)
            .await
    }

    /// Matches already-extracted skills against a job description. Two
    /// completion calls: job skills, narrative.
    pub async fn match_skills(
        &self,
        skills: &SkillSet,
        job_description: &str,
    ) -> Result<MatchReport, ExtractError> {
        require_text(job_description)?;
        let candidate = format!(
            "Candidate skills:\n{}",
            skills.all().collect::<Vec<_>>().join(", ")
        );
        self.build_match_report(skills, job_description, &candidate)
            .await
    }

    /// Writes a short professional summary from extracted resume data.
    pub async fn generate_summary(&self, resume: &ResumeRecord) -> Result<String, ExtractError> {
        let resume_data = serde_json::to_string_pretty(resume)
            .map_err(|e| ExtractError::InvalidParameter(format!("resume_data: {e}")))?;

        let prompt = render(SUMMARY_PROMPT_TEMPLATE, &[("resume_data", &resume_data)]);
        let request = self
            .extractor
            .text_request(prompt)
            .with_temperature(SUMMARY_TEMPERATURE)
            .with_max_tokens(SUMMARY_MAX_TOKENS);

        let summary = self.extractor.complete_text(request).await?;
        Ok(summary.trim().to_string())
    }

    async fn build_match_report(
        &self,
        skills: &SkillSet,
        job_description: &str,
        candidate: &str,
    ) -> Result<MatchReport, ExtractError> {
        let job_skills = self.job_skills(job_description).await?;
        let overlap = score_skill_overlap(skills.all(), job_skills.iter().map(String::as_str));

        debug!(
            job_skills = job_skills.len(),
            score = overlap.score,
            missing = overlap.missing.len(),
            "scored skill overlap"
        );

        let score = overlap.score.to_string();
        let prompt = render(
            MATCH_PROMPT_TEMPLATE,
            &[
                ("candidate", candidate),
                ("job_description", job_description),
                ("match_score", &score),
                ("matching_skills", &list_or_none(&overlap.matching)),
                ("partial_skills", &list_or_none(&overlap.partial)),
                ("missing_skills", &list_or_none(&overlap.missing)),
            ],
        );
        let request = self
            .extractor
            .json_request(prompt)
            .with_max_tokens(MATCH_MAX_TOKENS);
        let narrative: MatchNarrative = self.extractor.complete_record(request).await?;

        Ok(MatchReport {
            match_score: overlap.score,
            matching_skills: overlap.matching,
            partial_skills: overlap.partial,
            missing_skills: overlap.missing,
            relevant_experience: narrative.relevant_experience,
            strengths: narrative.strengths,
            gaps: narrative.gaps,
            recommendations: narrative.recommendations,
            summary: narrative.summary.trim().to_string(),
        })
    }

    async fn job_skills(&self, job_description: &str) -> Result<Vec<String>, ExtractError> {
        let prompt = render(
            JOB_SKILLS_PROMPT_TEMPLATE,
            &[("job_description", job_description)],
        );
        let request = self
            .extractor
            .json_request(prompt)
            .with_max_tokens(SKILLS_MAX_TOKENS);
        let reply: JobSkillsReply = self.extractor.complete_record(request).await?;
        Ok(reply.required_skills)
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::extraction::ExtractorSettings;
    use crate::llm_client::{LlmError, Provider};
    use crate::testing::ScriptedCompleter;

    const RESUME_TEXT: &str = "Jane Doe\njane@example.com\nSenior engineer. Rust, Tokio, PostgreSQL, Docker.";
    const JOB: &str = "We need a backend engineer with Rust, PostgreSQL and Kubernetes.";

    const NARRATIVE: &str = r#"{
        "relevant_experience": ["Senior backend engineer"],
        "strengths": ["Strong Rust background"],
        "gaps": ["No Kubernetes"],
        "recommendations": ["Mention container orchestration work"],
        "summary": " Good fit overall. "
    }"#;

    fn resumes(replies: &[&str]) -> (ResumeExtractor, Arc<ScriptedCompleter>) {
        let completer = Arc::new(ScriptedCompleter::new(replies));
        let text = TextExtractor::new(
            completer.clone(),
            ExtractorSettings::for_provider(Provider::Anthropic),
        )
        .unwrap();
        (ResumeExtractor::new(text), completer)
    }

    #[tokio::test]
    async fn test_extract_uses_resume_schema() {
        let (ex, completer) = resumes(&[r#"{
            "personal_info": {"name": "Jane Doe", "email": "jane@example.com", "phone": null},
            "skills": {"technical": ["Rust"], "tools": null},
            "work_experience": null
        }"#]);

        let record = ex.extract(RESUME_TEXT).await.unwrap();

        assert_eq!(record.personal_info.name.as_deref(), Some("Jane Doe"));
        assert!(record.personal_info.phone.is_none());
        assert_eq!(record.skills.technical, vec!["Rust"]);
        assert!(record.work_experience.is_empty());
        assert!(completer.requests()[0].prompt.contains("\"soft_skills\""));
    }

    #[tokio::test]
    async fn test_extract_contact_info_token_budget() {
        let (ex, completer) = resumes(&[
            r#"{"name": "Jane Doe", "email": "jane@example.com", "linkedin": null}"#,
        ]);

        let contact = ex.extract_contact_info(RESUME_TEXT).await.unwrap();

        assert_eq!(contact.email.as_deref(), Some("jane@example.com"));
        assert!(contact.linkedin.is_none());
        assert_eq!(completer.requests()[0].max_tokens, CONTACT_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_extract_skills_missing_groups_are_empty() {
        let (ex, completer) = resumes(&[r#"```json
{"technical": ["Rust", "Tokio"], "tools": ["Docker"]}
```"#]);

        let skills = ex.extract_skills(RESUME_TEXT).await.unwrap();

        assert_eq!(skills.technical, vec!["Rust", "Tokio"]);
        assert_eq!(skills.tools, vec!["Docker"]);
        assert!(skills.soft_skills.is_empty());
        assert_eq!(completer.requests()[0].max_tokens, SKILLS_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_extract_skills_unparseable_reply() {
        let (ex, _) = resumes(&["Rust, Tokio and Docker."]);
        let err = ex.extract_skills(RESUME_TEXT).await.unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_match_job_description_makes_three_calls() {
        let (ex, completer) = resumes(&[
            r#"{"technical": ["Rust", "Tokio", "PostgreSQL"], "tools": ["Docker"]}"#,
            r#"{"required_skills": ["Rust", "PostgreSQL", "Kubernetes"]}"#,
            NARRATIVE,
        ]);

        let report = ex.match_job_description(RESUME_TEXT, JOB).await.unwrap();

        // (1.0 + 1.0 + 0.0) / 3 → 67
        assert_eq!(report.match_score, 67);
        assert_eq!(report.matching_skills, vec!["Rust", "PostgreSQL"]);
        assert_eq!(report.missing_skills, vec!["Kubernetes"]);
        assert_eq!(report.gaps, vec!["No Kubernetes"]);
        assert_eq!(report.summary, "Good fit overall.");

        let sent = completer.requests();
        assert_eq!(sent.len(), 3);
        assert!(sent[2].prompt.contains("Match score: 67/100"));
        assert!(sent[2].prompt.contains("Missing skills: Kubernetes"));
        assert!(sent[2].prompt.contains(RESUME_TEXT));
    }

    #[tokio::test]
    async fn test_match_skills_makes_two_calls() {
        let (ex, completer) = resumes(&[
            r#"{"required_skills": ["rust", "tokio"]}"#,
            NARRATIVE,
        ]);
        let skills = SkillSet {
            technical: vec!["Rust".into(), "Tokio".into()],
            ..SkillSet::default()
        };

        let report = ex.match_skills(&skills, JOB).await.unwrap();

        assert_eq!(report.match_score, 100);
        assert!(report.missing_skills.is_empty());
        assert_eq!(completer.requests().len(), 2);
        assert!(completer.requests()[1].prompt.contains("Missing skills: none"));
    }

    #[tokio::test]
    async fn test_match_with_no_job_skills_scores_100() {
        let (ex, _) = resumes(&[r#"{"required_skills": []}"#, "{}"]);
        let report = ex.match_skills(&SkillSet::default(), JOB).await.unwrap();
        assert_eq!(report.match_score, 100);
        assert!(report.summary.is_empty());
    }

    #[tokio::test]
    async fn test_match_rejects_empty_job_description() {
        let (ex, completer) = resumes(&[]);
        let err = ex.match_skills(&SkillSet::default(), "  ").await.unwrap_err();
        assert!(matches!(err, ExtractError::InvalidParameter(_)));
        assert!(completer.requests().is_empty());
    }

    #[tokio::test]
    async fn test_match_propagates_transport_error() {
        let completer = Arc::new(ScriptedCompleter::failing(LlmError::RateLimited {
            retry_after_secs: Some(30),
        }));
        let text = TextExtractor::new(completer, ExtractorSettings::for_provider(Provider::OpenAi))
            .unwrap();
        let ex = ResumeExtractor::new(text);

        let err = ex.match_job_description(RESUME_TEXT, JOB).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Transport(LlmError::RateLimited { .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_summary_sampling() {
        let (ex, completer) = resumes(&["  Seasoned Rust engineer with a backend focus.\n"]);
        let resume = ResumeRecord {
            summary: Some("Backend engineer".into()),
            ..ResumeRecord::default()
        };

        let summary = ex.generate_summary(&resume).await.unwrap();

        assert_eq!(summary, "Seasoned Rust engineer with a backend focus.");
        let sent = &completer.requests()[0];
        assert_eq!(sent.temperature, SUMMARY_TEMPERATURE);
        assert_eq!(sent.max_tokens, SUMMARY_MAX_TOKENS);
        assert!(!sent.json_mode);
        assert!(sent.prompt.contains("\"summary\": \"Backend engineer\""));
    }
}
