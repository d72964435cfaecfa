//! Axum route handlers for the Interview API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::interview::{AnswerAnalysis, TurnContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    pub question: String,
    pub answer: String,
    pub criterion: Option<String>,
    #[serde(default)]
    pub turn: TurnContext,
}

/// POST /api/v1/interview/classify
///
/// Infallible by contract: the live interview controller always gets a verdict.
pub async fn handle_classify(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Json<AnswerAnalysis> {
    let analysis = state
        .classifier
        .classify(
            &request.question,
            &request.answer,
            request.criterion.as_deref(),
            &request.turn,
        )
        .await;

    Json(analysis)
}
