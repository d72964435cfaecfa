//! Scoring Engine — resume × job description → qualification verdict.
//!
//! Flow: validate input → rubric prompt → bounded model call → strip fences →
//!       parse → schema check → recompute verdict from the weighted breakdown.
//!
//! The engine, not the model, decides `qualified`. There is no fallback here:
//! model and parse failures propagate to the caller as `ScoringError`.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::llm_client::prompts::{fill_placeholders, json_system, UNTRUSTED_INPUT_INSTRUCTION};
use crate::llm_client::{strip_json_fences, LlmError, TextGenerator};
use crate::scoring::models::{EvaluationContext, EvaluationResult, Overall};
use crate::scoring::prompts::{
    render_context, render_rubric, FAIRNESS_GUIDELINES, SCORING_PERSONA, SCORING_PROMPT_TEMPLATE,
};
use crate::scoring::validation::validate_reply;
use crate::scoring::{ScoringConfig, ScoringError};

pub struct ScoringEngine {
    generator: Arc<dyn TextGenerator>,
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(generator: Arc<dyn TextGenerator>, config: ScoringConfig) -> Self {
        Self { generator, config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Evaluates a resume against a job description at the given threshold (0–100).
    pub async fn evaluate(
        &self,
        resume_text: &str,
        job_description: &str,
        threshold: f64,
        context: Option<&EvaluationContext>,
    ) -> Result<EvaluationResult, ScoringError> {
        if resume_text.trim().is_empty() {
            return Err(ScoringError::InvalidInput("resume text is empty".to_string()));
        }
        if job_description.trim().is_empty() {
            return Err(ScoringError::InvalidInput(
                "job description is empty".to_string(),
            ));
        }
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            return Err(ScoringError::InvalidInput(format!(
                "threshold must be between 0 and 100, got {threshold}"
            )));
        }

        let prompt = build_prompt(resume_text, job_description, context);
        let system = json_system(SCORING_PERSONA);

        let raw = self
            .generator
            .complete_within(&prompt, &system, self.config.timeout)
            .await
            .map_err(|e| match e {
                LlmError::EmptyContent => {
                    ScoringError::MalformedOutput("model returned no text".to_string())
                }
                other => ScoringError::ModelUnavailable(other.to_string()),
            })?;

        let value: Value = serde_json::from_str(strip_json_fences(&raw))
            .map_err(|e| ScoringError::MalformedOutput(format!("invalid JSON: {e}")))?;

        let reply = validate_reply(&value).map_err(ScoringError::MalformedOutput)?;

        let weighted_sum = reply.breakdown.weighted_sum();
        let qualified = weighted_sum >= threshold;

        if let Some(claimed) = reply.model_reported_qualified {
            if claimed != qualified {
                warn!(
                    "Model claimed qualified={} but weighted sum {:.2} vs threshold {:.2} gives {}; using engine verdict",
                    claimed, weighted_sum, threshold, qualified
                );
            }
        }

        debug!(
            "Breakdown: {}",
            reply
                .breakdown
                .iter()
                .map(|(c, s)| format!("{}={}", c.key(), s.score))
                .collect::<Vec<_>>()
                .join(", ")
        );
        info!(
            "Evaluation complete: weighted_sum={:.2} threshold={:.2} qualified={}",
            weighted_sum, threshold, qualified
        );

        Ok(EvaluationResult {
            overall: Overall {
                score_percent: weighted_sum.round().clamp(0.0, 100.0) as u8,
                qualified,
                reason_summary: reply.reason_summary,
                weighted_sum,
                threshold,
                model_reported_qualified: reply.model_reported_qualified,
            },
            breakdown: reply.breakdown,
            extracted: reply.extracted,
            gaps_and_notes: reply.gaps_and_notes,
            model: self.generator.model_name().to_string(),
            evaluated_at: Utc::now(),
        })
    }
}

/// Candidate text is substituted last so placeholder-looking text inside it is never expanded.
fn build_prompt(
    resume_text: &str,
    job_description: &str,
    context: Option<&EvaluationContext>,
) -> String {
    let rubric = render_rubric();
    let context = render_context(context);
    fill_placeholders(
        SCORING_PROMPT_TEMPLATE,
        &[
            ("rubric", rubric.as_str()),
            ("fairness", FAIRNESS_GUIDELINES),
            ("untrusted", UNTRUSTED_INPUT_INSTRUCTION),
            ("context", context.as_str()),
            ("job_description", job_description.trim()),
            ("resume_text", resume_text.trim()),
        ],
    )
}
