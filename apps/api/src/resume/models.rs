use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Structured resume as extracted. Sections the document lacks come back
/// empty (collections) or `None` (scalars).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub personal_info: ContactInfo,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: SkillSet,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub awards: Vec<String>,
    #[serde(default)]
    pub publications: Vec<String>,
    #[serde(default)]
    pub languages: Vec<LanguageSkill>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Skills grouped by kind. Missing groups deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSet {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
}

impl SkillSet {
    /// Every skill across all groups, in group order.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.technical
            .iter()
            .chain(&self.languages)
            .chain(&self.tools)
            .chain(&self.soft_skills)
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.all().next().is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    /// `"Present"` for a current role.
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub graduation_date: Option<String>,
    /// Kept as text; models return both `3.8` and `"3.8/4.0"`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub gpa: Option<String>,
    #[serde(default)]
    pub honors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub issuing_organization: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub credential_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageSkill {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub proficiency: Option<String>,
}

/// Resume-to-job match. The score and the three skill lists are computed
/// locally; the narrative fields come from the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// 0 – 100
    pub match_score: u32,
    pub matching_skills: Vec<String>,
    pub partial_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub relevant_experience: Vec<String>,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub recommendations: Vec<String>,
    pub summary: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resume_record_tolerates_sparse_reply() {
        let record: ResumeRecord = serde_json::from_value(json!({
            "personal_info": {"name": "Jane Doe", "email": "jane@example.com"},
            "skills": {"technical": ["Rust", "SQL"]},
            "education": [{"institution": "MIT", "gpa": 3.9}]
        }))
        .unwrap();

        assert_eq!(record.personal_info.name.as_deref(), Some("Jane Doe"));
        assert!(record.work_experience.is_empty());
        assert_eq!(record.skills.technical, vec!["Rust", "SQL"]);
        assert!(record.skills.tools.is_empty());
        assert_eq!(record.education[0].gpa.as_deref(), Some("3.9"));
    }

    #[test]
    fn test_skill_set_all_in_group_order() {
        let skills = SkillSet {
            technical: vec!["Rust".into()],
            languages: vec!["English".into()],
            tools: vec!["Git".into()],
            soft_skills: vec!["Mentoring".into()],
        };
        let all: Vec<&str> = skills.all().collect();
        assert_eq!(all, vec!["Rust", "English", "Git", "Mentoring"]);
        assert!(!skills.is_empty());
        assert!(SkillSet::default().is_empty());
    }
}
