// All LLM prompt constants for the Scoring module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::scoring::models::EvaluationContext;
use crate::scoring::rubric::Category;

/// Persona for resume evaluation. Combined with JSON-only rules via `json_system`.
pub const SCORING_PERSONA: &str = "You are an experienced technical recruiter scoring a \
    candidate's resume against a job description using a fixed, weighted rubric.";

/// Fairness rules every evaluation must follow.
pub const FAIRNESS_GUIDELINES: &str = "\
FAIRNESS GUIDELINES:
- Give partial credit for adjacent technologies (e.g. Vue experience toward a React requirement) \
and adjacent roles (e.g. SRE toward a DevOps role).
- Do NOT penalise ordinary job changes. Tenures of a year or more are normal.
- Do NOT penalise employment gaps unless the job description makes continuity a requirement.
- Ignore name, age, gender, nationality, photos and any other protected characteristic.
- Only record a red flag for something concrete: contradictory dates, claims that conflict with \
each other, or a resume missing the information needed to assess the role at all.";

/// Resume scoring prompt template.
/// Replace: {rubric}, {fairness}, {untrusted}, {context}, {job_description}, {resume_text}
pub const SCORING_PROMPT_TEMPLATE: &str = r#"Score the candidate's resume against the job description.

RUBRIC (score every category from 0 to 100):
{rubric}

{fairness}

{untrusted}

Return a JSON object with this EXACT schema (no extra fields):
{
  "overall": {
    "score_percent": 72,
    "qualified": true,
    "reason_summary": "Two sentences explaining the verdict."
  },
  "breakdown": {
    "role_title_alignment": {"score": 80, "evidence": ["Senior Frontend Engineer at Acme (2019-2024)"]},
    "hard_skills": {"score": 75, "evidence": ["React, Node.js, PostgreSQL listed and used in projects"]},
    "experience_depth": {"score": 70, "evidence": ["6 years professional experience"]},
    "domain_relevance": {"score": 60, "evidence": ["Fintech background"]},
    "education_certifications": {"score": 50, "evidence": ["BSc Computer Science"]},
    "nice_to_have": {"score": 40, "evidence": ["Some AWS exposure"]},
    "communication_red_flags": {"score": 90, "evidence": ["Clear, consistent timeline"]}
  },
  "extracted": {
    "name": "Full Name",
    "email": "name@example.com",
    "phone": "+1 555 0100",
    "location": "City, Country",
    "current_title": "Senior Frontend Engineer",
    "total_years_experience": 6,
    "skills": ["React", "Node.js"],
    "education": ["BSc Computer Science, Example University"],
    "certifications": [],
    "employers": ["Acme"]
  },
  "gaps_and_notes": {
    "missing_requirements": ["Kubernetes"],
    "red_flags": [],
    "notes": ["Strong open-source portfolio"]
  }
}

Evidence entries must quote or closely paraphrase the resume. Use null for unknown extracted fields.

{context}
JOB DESCRIPTION:
{job_description}

CANDIDATE RESUME:
{resume_text}"#;

/// Renders the rubric block: one line per category with its weight and guidance.
pub fn render_rubric() -> String {
    Category::ALL
        .iter()
        .map(|c| format!("- {} (weight {}): {}", c.key(), c.weight(), c.guidance()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the optional context block. Empty when there is nothing to add.
pub fn render_context(context: Option<&EvaluationContext>) -> String {
    let Some(context) = context.filter(|c| !c.is_empty()) else {
        return String::new();
    };

    let mut block = String::from("ROLE CONTEXT:\n");
    if let Some(title) = &context.job_title {
        block.push_str(&format!("- Job title: {title}\n"));
    }
    if let Some(company) = &context.company_name {
        block.push_str(&format!("- Company: {company}\n"));
    }
    if let Some(notes) = &context.notes {
        block.push_str(&format!("- Recruiter notes: {notes}\n"));
    }
    block.push('\n');
    block
}
