// Notifications: durable, idempotent "you qualified" messages.
// Tasks are persisted rows claimed atomically by workers; at most one live task per application.

pub mod dispatcher;
#[cfg(test)]
pub mod fakes;
pub mod handlers;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod template;
pub mod worker;

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

pub use dispatcher::WebhookDispatcher;
pub use models::ScheduleOutcome;
pub use scheduler::NotificationScheduler;
pub use store::PgStore;

/// Template category used for qualified-candidate messages.
pub const CATEGORY_QUALIFIED: &str = "qualified";

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Default wait between qualification and dispatch.
    pub delay: Duration,
    pub poll_interval: Duration,
    /// Claims older than this are assumed orphaned by a dead worker.
    pub stale_claim_after: Duration,
    pub webhook_url: String,
    pub sender_name: Option<String>,
    pub sender_title: Option<String>,
    pub sender_designation: Option<String>,
    pub meeting_link: Option<String>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("dispatch rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("application {application_id} belongs to job {actual}, not {requested}")]
    JobMismatch {
        application_id: Uuid,
        requested: Uuid,
        actual: Uuid,
    },

    #[error("notification delay is out of range")]
    InvalidDelay,

    #[error(transparent)]
    Store(#[from] StoreError),
}
