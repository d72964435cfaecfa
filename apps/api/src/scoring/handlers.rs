//! Axum route handlers for the Scoring API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::scoring::{EvaluationContext, EvaluationResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub resume_text: String,
    pub job_description: String,
    pub threshold: Option<f64>,
    #[serde(default)]
    pub context: Option<EvaluationContext>,
}

/// POST /api/v1/evaluations
///
/// Stateless evaluation. Nothing is persisted; callers that want the
/// qualification workflow use `/applications/:id/qualify` instead.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluationResult>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let threshold = request
        .threshold
        .unwrap_or(state.scoring.config().default_threshold);

    let result = state
        .scoring
        .evaluate(
            &request.resume_text,
            &request.job_description,
            threshold,
            request.context.as_ref(),
        )
        .await?;

    Ok(Json(result))
}
