use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::qualification::QualificationOutcome;
use crate::scoring::EvaluationContext;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QualifyRequest {
    pub resume_text: String,
    pub job_description: String,
    pub threshold: Option<f64>,
    #[serde(default)]
    pub context: Option<EvaluationContext>,
}

/// POST /api/v1/applications/:id/qualify
pub async fn handle_qualify(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(request): Json<QualifyRequest>,
) -> Result<Json<QualificationOutcome>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let outcome = state
        .orchestrator
        .qualify(
            application_id,
            &request.resume_text,
            &request.job_description,
            request.threshold,
            request.context.as_ref(),
        )
        .await?;

    Ok(Json(outcome))
}
