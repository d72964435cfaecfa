use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::notifications::ScheduleOutcome;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub job_id: Uuid,
    /// Overrides the configured delay.
    pub delay_secs: Option<u64>,
}

/// POST /api/v1/applications/:id/notify
///
/// Enqueue-with-acknowledgement: the response says whether a task now exists.
pub async fn handle_notify(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(request): Json<NotifyRequest>,
) -> Result<Json<ScheduleOutcome>, AppError> {
    let delay = request
        .delay_secs
        .map(Duration::from_secs)
        .unwrap_or(state.scheduler.config().delay);

    let outcome = state
        .scheduler
        .on_qualified(application_id, request.job_id, delay)
        .await?;

    Ok(Json(outcome))
}
