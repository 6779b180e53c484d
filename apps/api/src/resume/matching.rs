//! Deterministic skill overlap between a resume and a job description.
//!
//! Algorithm:
//! 1. Normalize both skill lists (trim, drop blanks, dedup case-insensitively
//!    keeping the first spelling).
//! 2. For each job skill:
//!    - exact (case-insensitive) resume match → strength 1.0, `matching`
//!    - whole-word containment either way    → strength 0.6, `partial`
//!    - no match                             → strength 0.0, `missing`
//! 3. score = round(Σ strength / |job skills| × 100)
//!
//! A job with no skills is fully covered by any resume and scores 100.
//!
//! Containment compares word sequences, so "Kubernetes" is partially covered
//! by "Kubernetes administration" but "Go" is not covered by "MongoDB".

use std::collections::HashSet;

pub const EXACT_MATCH_STRENGTH: f64 = 1.0;
pub const PARTIAL_MATCH_STRENGTH: f64 = 0.6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillOverlap {
    /// 0 – 100
    pub score: u32,
    pub matching: Vec<String>,
    pub partial: Vec<String>,
    pub missing: Vec<String>,
}

pub fn normalize_skills<'a>(skills: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Lowercase words of a skill. `+` and `#` stay inside words so "C++" and
/// "C#" differ from "C".
fn skill_words(skill: &str) -> Vec<String> {
    skill
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// True when `needle` appears as a contiguous run of words in `haystack`.
fn contains_words(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}

pub fn score_skill_overlap<'a, 'b>(
    resume_skills: impl IntoIterator<Item = &'a str>,
    job_skills: impl IntoIterator<Item = &'b str>,
) -> SkillOverlap {
    let resume: Vec<(String, Vec<String>)> = normalize_skills(resume_skills)
        .into_iter()
        .map(|s| {
            let words = skill_words(&s);
            (s.to_lowercase(), words)
        })
        .collect();
    let job = normalize_skills(job_skills);

    if job.is_empty() {
        return SkillOverlap {
            score: 100,
            ..SkillOverlap::default()
        };
    }

    let mut overlap = SkillOverlap::default();
    let mut total = 0.0_f64;

    for skill in &job {
        let wanted = skill.to_lowercase();
        let wanted_words = skill_words(skill);

        let strength = if resume.iter().any(|(r, _)| *r == wanted) {
            EXACT_MATCH_STRENGTH
        } else if resume.iter().any(|(_, words)| {
            contains_words(words, &wanted_words) || contains_words(&wanted_words, words)
        }) {
            PARTIAL_MATCH_STRENGTH
        } else {
            0.0
        };

        total += strength;

        if strength >= EXACT_MATCH_STRENGTH {
            overlap.matching.push(skill.clone());
        } else if strength > 0.0 {
            overlap.partial.push(skill.clone());
        } else {
            overlap.missing.push(skill.clone());
        }
    }

    overlap.score = ((total / job.len() as f64) * 100.0).round().clamp(0.0, 100.0) as u32;
    overlap
}
