use std::sync::Arc;

use crate::interview::AnswerClassifier;
use crate::notifications::NotificationScheduler;
use crate::qualification::QualificationOrchestrator;
use crate::scoring::ScoringEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub scoring: Arc<ScoringEngine>,
    pub classifier: Arc<AnswerClassifier>,
    pub orchestrator: Arc<QualificationOrchestrator>,
    /// Also driven by the notification worker spawned in `main`.
    pub scheduler: Arc<NotificationScheduler>,
}
