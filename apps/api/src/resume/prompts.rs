use serde_json::{json, Value};

/// Field descriptions sent with every full resume extraction.
pub fn resume_schema() -> Value {
    json!({
        "personal_info": {
            "name": "string",
            "email": "string",
            "phone": "string",
            "location": "string (city, state/country)",
            "linkedin": "string (URL)",
            "github": "string (URL)",
            "website": "string (URL)"
        },
        "summary": "string (professional summary/objective)",
        "work_experience": [
            {
                "company": "string",
                "position": "string",
                "location": "string",
                "start_date": "string (MM/YYYY)",
                "end_date": "string (MM/YYYY or 'Present')",
                "description": "string",
                "achievements": ["string"]
            }
        ],
        "education": [
            {
                "institution": "string",
                "degree": "string",
                "field_of_study": "string",
                "location": "string",
                "graduation_date": "string (MM/YYYY)",
                "gpa": "string (optional)",
                "honors": ["string"]
            }
        ],
        "skills": {
            "technical": ["string"],
            "languages": ["string"],
            "tools": ["string"],
            "soft_skills": ["string"]
        },
        "certifications": [
            {
                "name": "string",
                "issuing_organization": "string",
                "date": "string (MM/YYYY)",
                "credential_id": "string (optional)"
            }
        ],
        "projects": [
            {
                "name": "string",
                "description": "string",
                "technologies": ["string"],
                "url": "string (optional)"
            }
        ],
        "awards": ["string"],
        "publications": ["string"],
        "languages": [{"language": "string", "proficiency": "string"}]
    })
}

/// Replace: {resume_text}
pub const CONTACT_PROMPT_TEMPLATE: &str = r#"Extract contact information from this resume.

Resume:
{resume_text}

Return ONLY a JSON object with these fields (use null for missing fields):
{
  "name": "Full Name",
  "email": "email@example.com",
  "phone": "+1-234-567-8900",
  "location": "City, State",
  "linkedin": "https://linkedin.com/in/username",
  "github": "https://github.com/username",
  "website": "https://example.com"
}"#;

/// Replace: {resume_text}
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"Extract all skills from this resume, categorized by type.

Resume:
{resume_text}

Return ONLY a JSON object:
{
  "technical": ["Python", "Java", "etc"],
  "languages": ["English", "Spanish", "etc"],
  "tools": ["Git", "Docker", "etc"],
  "soft_skills": ["Leadership", "Communication", "etc"]
}"#;

/// Replace: {job_description}
pub const JOB_SKILLS_PROMPT_TEMPLATE: &str = r#"List the skills this job description asks for.

Job Description:
{job_description}

Include technologies, tools, spoken languages and soft skills that are required or preferred.
Use short canonical names ("Kubernetes", not "experience running Kubernetes clusters").

Return ONLY a JSON object:
{
  "required_skills": ["skill1", "skill2"]
}"#;

/// Replace: {candidate}, {job_description}, {match_score}, {matching_skills},
/// {partial_skills}, {missing_skills}
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Analyze how well this candidate matches the job description.

{candidate}

Job Description:
{job_description}

Skill comparison (already computed, do not change it):
- Match score: {match_score}/100
- Matching skills: {matching_skills}
- Partially matching skills: {partial_skills}
- Missing skills: {missing_skills}

Return ONLY a JSON object with:
{
  "relevant_experience": ["experience1", "experience2"],
  "strengths": ["strength1", "strength2"],
  "gaps": ["gap1", "gap2"],
  "recommendations": ["recommendation1", "recommendation2"],
  "summary": "Brief analysis of the match"
}"#;

/// Replace: {resume_data}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Based on this resume data, write a compelling 2-3 sentence professional summary:

{resume_data}

Write a concise, impactful professional summary that highlights key qualifications and value proposition."#;
