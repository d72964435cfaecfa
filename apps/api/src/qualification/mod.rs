// Qualification: score an application, record the verdict, and hand qualified
// candidates to the notification scheduler.

pub mod handlers;
pub mod orchestrator;

pub use orchestrator::{QualificationOrchestrator, QualificationOutcome};

use thiserror::Error;

use crate::notifications::StoreError;
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum QualificationError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
