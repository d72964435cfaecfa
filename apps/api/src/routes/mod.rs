pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::notifications::handlers as notifications;
use crate::qualification::handlers as qualification;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring
        .route("/api/v1/evaluations", post(scoring::handle_evaluate))
        // Qualification workflow
        .route(
            "/api/v1/applications/:id/qualify",
            post(qualification::handle_qualify),
        )
        .route(
            "/api/v1/applications/:id/notify",
            post(notifications::handle_notify),
        )
        // Live interview
        .route(
            "/api/v1/interview/classify",
            post(interview::handle_classify),
        )
        .with_state(state)
}
