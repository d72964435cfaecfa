//! Answer Classifier — decides whether an interview answer is enough to move on.
//!
//! Order (first match wins):
//! 1. move-on phrase          → proceed, confidence 100, no model call
//! 2. setup turn / ack phrase → proceed, confidence 100, no model call
//! 3. model verdict under timeout, then the lenient policy
//! 4. heuristic fallback on any model-path failure

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::interview::heuristic;
use crate::interview::patterns::{
    is_genuine_non_answer, is_move_on, is_setup_acknowledgement, mentions_concrete_experience, normalize,
    word_count,
};
use crate::interview::prompts::{CLASSIFIER_PERSONA, CLASSIFY_PROMPT_TEMPLATE};
use crate::interview::{
    AnalysisSource, AnswerAnalysis, ClassificationDegraded, ClassifierConfig, Recommendation,
    TurnContext,
};
use crate::llm_client::prompts::{fill_placeholders, json_system, UNTRUSTED_INPUT_INSTRUCTION};
use crate::llm_client::{fields, strip_json_fences, LlmError, TextGenerator};

/// On-topic answers at least this long always proceed.
const LENIENT_MIN_WORDS: usize = 25;
const LENIENT_MIN_CONFIDENCE: u8 = 70;

pub struct AnswerClassifier {
    generator: Arc<dyn TextGenerator>,
    config: ClassifierConfig,
}

impl AnswerClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>, config: ClassifierConfig) -> Self {
        Self { generator, config }
    }

    pub async fn classify(
        &self,
        question: &str,
        answer: &str,
        criterion: Option<&str>,
        turn: &TurnContext,
    ) -> AnswerAnalysis {
        let answer = normalize(answer);

        if is_move_on(&answer) {
            debug!("Turn {}: move-on phrase, skipping model", turn.turn_index);
            return AnswerAnalysis::short_circuit("Candidate asked to move on");
        }

        if turn.is_setup || is_setup_acknowledgement(&answer) {
            debug!("Turn {}: setup confirmation, skipping model", turn.turn_index);
            return AnswerAnalysis::short_circuit("Setup or confirmation turn");
        }

        if answer.is_empty() {
            return heuristic::analyze(&answer, criterion, "empty answer");
        }

        let remote = if self.config.remote_enabled {
            self.classify_remote(question, &answer, criterion, turn).await
        } else {
            Err(ClassificationDegraded::Disabled)
        };

        match remote {
            Ok(analysis) => apply_lenient_policy(analysis, &answer),
            Err(ClassificationDegraded::Disabled) => {
                heuristic::analyze(&answer, criterion, "remote disabled")
            }
            Err(degraded) => {
                warn!(
                    "Turn {}: {}; falling back to heuristic",
                    turn.turn_index, degraded
                );
                heuristic::analyze(&answer, criterion, &degraded.to_string())
            }
        }
    }

    async fn classify_remote(
        &self,
        question: &str,
        answer: &str,
        criterion: Option<&str>,
        turn: &TurnContext,
    ) -> Result<AnswerAnalysis, ClassificationDegraded> {
        let prompt = build_prompt(question, answer, criterion, turn);
        let system = json_system(CLASSIFIER_PERSONA);

        let raw = self
            .generator
            .complete_within(&prompt, &system, self.config.timeout)
            .await
            .map_err(|e| match e {
                LlmError::Timeout(limit) => ClassificationDegraded::Timeout(limit),
                other => ClassificationDegraded::Backend(other.to_string()),
            })?;

        let value: Value = serde_json::from_str(strip_json_fences(&raw))
            .map_err(|e| ClassificationDegraded::Unparsable(e.to_string()))?;

        parse_verdict(&value)
    }
}

fn build_prompt(
    question: &str,
    answer: &str,
    criterion: Option<&str>,
    turn: &TurnContext,
) -> String {
    let turn_label = match (turn.turn_index, turn.total_turns) {
        (0, _) => "(position unknown)".to_string(),
        (index, 0) => format!("{index}"),
        (index, total) => format!("{index} of {total}"),
    };

    fill_placeholders(
        CLASSIFY_PROMPT_TEMPLATE,
        &[
            ("job_title", turn.job_title.as_deref().unwrap_or("the role")),
            ("company", turn.company_name.as_deref().unwrap_or("the company")),
            ("turn", turn_label.as_str()),
            ("criterion", criterion.unwrap_or("general fit")),
            ("untrusted", UNTRUSTED_INPUT_INSTRUCTION),
            ("question", question.trim()),
            ("answer", answer),
        ],
    )
}

/// Schema check with defaults. A reply must carry at least a recommendation or
/// one of the boolean judgments; everything else falls back.
fn parse_verdict(value: &Value) -> Result<AnswerAnalysis, ClassificationDegraded> {
    let obj = value
        .as_object()
        .ok_or_else(|| ClassificationDegraded::Unparsable("not a JSON object".to_string()))?;

    let is_relevant = fields::boolean(obj.get("isRelevant"));
    let is_complete = fields::boolean(obj.get("isComplete"));
    let matches_criterion = fields::boolean(obj.get("matchesCriterion"));
    let recommendation = fields::string(obj.get("recommendation"))
        .as_deref()
        .and_then(Recommendation::parse);

    if recommendation.is_none() && is_relevant.is_none() && is_complete.is_none() {
        return Err(ClassificationDegraded::Unparsable(
            "no recommendation or judgment fields".to_string(),
        ));
    }

    let is_relevant = is_relevant.unwrap_or(true);
    let is_complete = is_complete.unwrap_or(true);
    let recommendation = recommendation.unwrap_or(if !is_relevant {
        Recommendation::Redirect
    } else if !is_complete {
        Recommendation::Elaborate
    } else {
        Recommendation::Proceed
    });

    let follow_up_prompt = match recommendation {
        Recommendation::Proceed => None,
        _ => fields::string(obj.get("followUpPrompt")),
    };

    Ok(AnswerAnalysis {
        is_relevant,
        is_complete,
        matches_criterion: matches_criterion.unwrap_or(is_relevant && is_complete),
        confidence_score: fields::score(obj.get("confidenceScore")).unwrap_or(50),
        recommendation,
        follow_up_prompt,
        details: fields::string(obj.get("details")).unwrap_or_default(),
        source: AnalysisSource::Model,
    })
}

/// Rewrites an over-strict model verdict to `proceed` when the answer is
/// substantial: long and on-topic, or on-topic and naming a concrete tool or
/// experience. Genuine non-answers and off-topic answers are left alone, and the
/// model's relevance judgment is never rewritten.
fn apply_lenient_policy(mut analysis: AnswerAnalysis, answer: &str) -> AnswerAnalysis {
    if analysis.recommendation == Recommendation::Proceed
        || !analysis.is_relevant
        || is_genuine_non_answer(answer)
    {
        return analysis;
    }

    let long_and_on_topic = word_count(answer) >= LENIENT_MIN_WORDS;
    let concrete = mentions_concrete_experience(answer);
    if !long_and_on_topic && !concrete {
        return analysis;
    }

    info!(
        "Lenient policy: model recommended {:?}, overriding to proceed",
        analysis.recommendation
    );
    let reason = if long_and_on_topic {
        "substantial on-topic answer"
    } else {
        "names concrete experience"
    };
    analysis.recommendation = Recommendation::Proceed;
    analysis.follow_up_prompt = None;
    analysis.confidence_score = analysis.confidence_score.max(LENIENT_MIN_CONFIDENCE);
    analysis.details = if analysis.details.is_empty() {
        format!("Lenient policy: {reason}")
    } else {
        format!("{} (lenient policy: {reason})", analysis.details)
    };
    analysis
}
