use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Application row owned by the applications service. Read here for the
/// idempotency flag and the candidate's contact details.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub notified: bool,
    pub notified_at: Option<DateTime<Utc>>,
}

/// Status values this engine writes when it records an evaluation.
pub const STATUS_QUALIFIED: &str = "qualified";
pub const STATUS_NOT_QUALIFIED: &str = "not_qualified";
