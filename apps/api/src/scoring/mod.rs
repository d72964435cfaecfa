// Scoring: resume × job description → weighted rubric verdict.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod engine;
#[cfg(test)]
pub mod fixtures;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod rubric;
pub mod validation;

use std::time::Duration;

use thiserror::Error;

pub use engine::ScoringEngine;
pub use models::{EvaluationContext, EvaluationResult};

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Threshold applied when a caller does not supply one.
    pub default_threshold: f64,
    pub timeout: Duration,
}

/// Scoring failures. All of them propagate to the caller.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Scoring model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Scoring model returned malformed output: {0}")]
    MalformedOutput(String),
}
