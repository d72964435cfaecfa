// Interview: per-turn answer classification for the live interview controller.
// Never fails — every path ends in a usable `AnswerAnalysis`.

pub mod classifier;
pub mod handlers;
pub mod heuristic;
pub mod patterns;
pub mod prompts;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use classifier::AnswerClassifier;

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub timeout: Duration,
    /// When false, every non-short-circuit turn goes straight to the heuristic.
    pub remote_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Proceed,
    Elaborate,
    Redirect,
}

impl Recommendation {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "proceed" | "continue" | "next" => Some(Recommendation::Proceed),
            "elaborate" | "clarify" | "follow_up" | "follow-up" => Some(Recommendation::Elaborate),
            "redirect" => Some(Recommendation::Redirect),
            _ => None,
        }
    }
}

/// Which path produced an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    ShortCircuit,
    Model,
    Heuristic,
}

/// Verdict for one interview turn. Ephemeral; never persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerAnalysis {
    pub is_relevant: bool,
    pub is_complete: bool,
    pub matches_criterion: bool,
    pub confidence_score: u8, // 0 – 100
    pub recommendation: Recommendation,
    pub follow_up_prompt: Option<String>,
    pub details: String,
    pub source: AnalysisSource,
}

impl AnswerAnalysis {
    pub fn short_circuit(details: &str) -> Self {
        Self {
            is_relevant: true,
            is_complete: true,
            matches_criterion: true,
            confidence_score: 100,
            recommendation: Recommendation::Proceed,
            follow_up_prompt: None,
            details: details.to_string(),
            source: AnalysisSource::ShortCircuit,
        }
    }
}

/// Where the turn sits in the interview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TurnContext {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    /// 1-based.
    pub turn_index: u32,
    pub total_turns: u32,
    /// Environment check (mic, camera) rather than a real question.
    pub is_setup: bool,
}

/// Why the model path could not be used. Internal only: always resolved by the heuristic.
#[derive(Debug, Error)]
pub enum ClassificationDegraded {
    #[error("remote classification disabled")]
    Disabled,

    #[error("classification timed out after {0:?}")]
    Timeout(Duration),

    #[error("classification backend failed: {0}")]
    Backend(String),

    #[error("classification reply unusable: {0}")]
    Unparsable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_parse_accepts_synonyms() {
        assert_eq!(Recommendation::parse("Proceed"), Some(Recommendation::Proceed));
        assert_eq!(Recommendation::parse(" clarify "), Some(Recommendation::Elaborate));
        assert_eq!(Recommendation::parse("redirect"), Some(Recommendation::Redirect));
        assert_eq!(Recommendation::parse("shrug"), None);
    }

    #[test]
    fn test_analysis_serializes_camel_case() {
        let json = serde_json::to_value(AnswerAnalysis::short_circuit("x")).unwrap();
        assert_eq!(json["isRelevant"], true);
        assert_eq!(json["confidenceScore"], 100);
        assert_eq!(json["recommendation"], "proceed");
        assert_eq!(json["source"], "short_circuit");
        assert!(json["followUpPrompt"].is_null());
    }

    #[test]
    fn test_turn_context_defaults_missing_fields() {
        let turn: TurnContext = serde_json::from_str(r#"{"turnIndex": 2}"#).unwrap();
        assert_eq!(turn.turn_index, 2);
        assert!(!turn.is_setup);
        assert!(turn.job_title.is_none());
    }
}
