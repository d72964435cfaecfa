use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::rubric::Breakdown;

/// Headline verdict. `qualified` and `score_percent` are always computed by the
/// engine from the breakdown, never copied from model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overall {
    pub score_percent: u8,
    pub qualified: bool,
    pub reason_summary: String,
    pub weighted_sum: f64,
    pub threshold: f64,
    /// What the model claimed, kept for audit only.
    pub model_reported_qualified: Option<bool>,
}

/// Structured facts pulled out of the resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub current_title: Option<String>,
    pub total_years_experience: Option<f64>,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
    pub employers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapsAndNotes {
    pub missing_requirements: Vec<String>,
    pub red_flags: Vec<String>,
    pub notes: Vec<String>,
}

/// Full result of one evaluation call. Immutable once built; the caller owns persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub overall: Overall,
    pub breakdown: Breakdown,
    pub extracted: ExtractedProfile,
    pub gaps_and_notes: GapsAndNotes,
    pub model: String,
    pub evaluated_at: DateTime<Utc>,
}

/// Optional extra context for an evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationContext {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    /// Free-form recruiter notes, e.g. "remote only" or "visa sponsorship available".
    #[serde(default)]
    pub notes: Option<String>,
}

impl EvaluationContext {
    pub fn is_empty(&self) -> bool {
        self.job_title.is_none() && self.company_name.is_none() && self.notes.is_none()
    }
}
