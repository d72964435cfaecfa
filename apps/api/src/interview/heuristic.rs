//! Offline fallback used whenever the model path is disabled, times out, or
//! returns something unusable. Always lenient: only a short non-answer is sent
//! back for elaboration.

use crate::interview::patterns::{
    content_word_count, is_genuine_non_answer, word_count, NON_ANSWER_MAX_CONTENT_WORDS,
};
use crate::interview::{AnalysisSource, AnswerAnalysis, Recommendation};

/// Answers this long are never scored below `LONG_ANSWER_MIN_CONFIDENCE`.
const LONG_ANSWER_WORDS: usize = 25;
const LONG_ANSWER_MIN_CONFIDENCE: u8 = 70;

pub fn analyze(answer: &str, criterion: Option<&str>, reason: &str) -> AnswerAnalysis {
    let content_words = content_word_count(answer);
    let total_words = word_count(answer);

    if is_genuine_non_answer(answer) {
        return AnswerAnalysis {
            is_relevant: false,
            is_complete: false,
            matches_criterion: false,
            confidence_score: 75,
            recommendation: Recommendation::Elaborate,
            follow_up_prompt: Some(elaboration_prompt(criterion)),
            details: format!(
                "Heuristic ({reason}): non-answer with {content_words} content words"
            ),
            source: AnalysisSource::Heuristic,
        };
    }

    AnswerAnalysis {
        is_relevant: true,
        is_complete: content_words >= NON_ANSWER_MAX_CONTENT_WORDS,
        matches_criterion: content_words >= 10,
        confidence_score: confidence_for(content_words, total_words),
        recommendation: Recommendation::Proceed,
        follow_up_prompt: None,
        details: format!(
            "Heuristic ({reason}): {total_words} words, {content_words} content words"
        ),
        source: AnalysisSource::Heuristic,
    }
}

fn confidence_for(content_words: usize, total_words: usize) -> u8 {
    let scaled = match content_words {
        20.. => 90,
        10..=19 => 75,
        5..=9 => 60,
        _ => 45,
    };
    if total_words >= LONG_ANSWER_WORDS {
        scaled.max(LONG_ANSWER_MIN_CONFIDENCE)
    } else {
        scaled
    }
}

pub fn elaboration_prompt(criterion: Option<&str>) -> String {
    match criterion.map(str::trim).filter(|c| !c.is_empty()) {
        Some(criterion) => format!(
            "Could you walk me through a specific example that shows your experience with {criterion}?"
        ),
        None => "Could you expand on that with a specific example from your experience?"
            .to_string(),
    }
}
