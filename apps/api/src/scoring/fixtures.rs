//! Canned model replies shared by tests across the crate.

use crate::scoring::rubric::Category;

/// A well-formed scoring reply with the given per-category scores, in `Category::ALL` order.
pub fn reply_with_scores(scores: [u8; 7], model_qualified: bool) -> String {
    let mut breakdown = serde_json::Map::new();
    for (category, score) in Category::ALL.iter().zip(scores) {
        breakdown.insert(
            category.key().to_string(),
            serde_json::json!({"score": score, "evidence": [format!("{} evidence", category.key())]}),
        );
    }
    serde_json::json!({
        "overall": {"score_percent": 99, "qualified": model_qualified, "reason_summary": "summary"},
        "breakdown": breakdown,
        "extracted": {"name": "Candidate", "skills": ["React"]},
        "gaps_and_notes": {"missing_requirements": [], "red_flags": [], "notes": []}
    })
    .to_string()
}
