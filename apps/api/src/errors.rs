use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::notifications::{SchedulingError, StoreError};
use crate::qualification::QualificationError;
use crate::scoring::ScoringError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Scheduling(SchedulingError),
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::NotFound(what) => AppError::NotFound(what),
            SchedulingError::Store(e) => AppError::Store(e),
            other => AppError::Scheduling(other),
        }
    }
}

impl From<QualificationError> for AppError {
    fn from(err: QualificationError) -> Self {
        match err {
            QualificationError::NotFound(what) => AppError::NotFound(what),
            QualificationError::Scoring(e) => AppError::Scoring(e),
            QualificationError::Store(e) => AppError::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", format!("{msg} not found")),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Scoring(ScoringError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone())
            }
            AppError::Scoring(ScoringError::ModelUnavailable(msg)) => {
                tracing::error!("Scoring model unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "MODEL_UNAVAILABLE",
                    "The scoring model is unavailable; retry later".to_string(),
                )
            }
            AppError::Scoring(ScoringError::MalformedOutput(msg)) => {
                tracing::error!("Scoring model returned malformed output: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_OUTPUT",
                    "The scoring model returned an unusable response".to_string(),
                )
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Scheduling(e) => (StatusCode::BAD_REQUEST, "SCHEDULING_ERROR", e.to_string()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_scoring_errors_map_to_distinct_statuses() {
        assert_eq!(
            status_of(ScoringError::InvalidInput("empty".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ScoringError::ModelUnavailable("down".into()).into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(ScoringError::MalformedOutput("prose".into()).into()),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_scheduling_not_found_is_404() {
        let err: AppError = SchedulingError::NotFound("job 42".into()).into();
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_errors_are_500() {
        let err: AppError = StoreError::Unavailable("pool closed".into()).into();
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_delay_is_400() {
        let err: AppError = SchedulingError::InvalidDelay.into();
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }
}
