use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of a persisted notification task.
///
/// `Pending` and `Claimed` are live; at most one live task exists per application.
/// Terminal states never return to `Pending`, except that a `Claimed` task whose
/// worker disappeared is re-queued by stale-claim recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    Claimed,
    Fired,
    SkippedDuplicate,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Claimed => "claimed",
            TaskStatus::Fired => "fired",
            TaskStatus::SkippedDuplicate => "skipped-duplicate",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "claimed" => Some(TaskStatus::Claimed),
            "fired" => Some(TaskStatus::Fired),
            "skipped-duplicate" => Some(TaskStatus::SkippedDuplicate),
            "failed" => Some(TaskStatus::Failed),
            _ => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Claimed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationTask {
    pub id: Uuid,
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub delay_secs: i64,
    pub scheduled_at: DateTime<Utc>,
    pub run_at: DateTime<Utc>,
    pub claimed_by: Option<String>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub fired_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub attempts: i32,
    pub last_error: Option<String>,
}

impl NotificationTask {
    pub fn task_status(&self) -> Option<TaskStatus> {
        TaskStatus::parse(&self.status)
    }
}

/// Insert parameters for a new pending task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub delay_secs: i64,
    pub scheduled_at: DateTime<Utc>,
    pub run_at: DateTime<Utc>,
}

/// Status reported back to whoever raised the qualifying event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleStatus {
    Pending,
    SkippedDuplicate,
    SkippedDisabled,
}

/// Acknowledgement for `on_qualified`: the caller always learns whether a task exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    pub scheduled: bool,
    pub status: ScheduleStatus,
    pub task_id: Option<Uuid>,
    pub run_at: Option<DateTime<Utc>>,
}

impl ScheduleOutcome {
    pub fn scheduled(task: &NotificationTask) -> Self {
        Self {
            scheduled: true,
            status: ScheduleStatus::Pending,
            task_id: Some(task.id),
            run_at: Some(task.run_at),
        }
    }

    pub fn skipped(status: ScheduleStatus) -> Self {
        Self {
            scheduled: false,
            status,
            task_id: None,
            run_at: None,
        }
    }
}

/// Payload handed to the external notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    pub candidate_name: String,
    pub candidate_email: String,
    pub job_title: String,
    pub company_name: String,
    pub rendered_message: String,
    pub category: String,
}

/// Raised by the orchestrator when an evaluation comes back qualified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationEvent {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub score: u8,
    pub qualified: bool,
    pub timestamp: DateTime<Utc>,
}

/// Result of firing one claimed task.
#[derive(Debug, Clone, PartialEq)]
pub enum FireOutcome {
    Fired,
    SkippedDuplicate,
    Failed(String),
}

impl FireOutcome {
    pub fn task_status(&self) -> TaskStatus {
        match self {
            FireOutcome::Fired => TaskStatus::Fired,
            FireOutcome::SkippedDuplicate => TaskStatus::SkippedDuplicate,
            FireOutcome::Failed(_) => TaskStatus::Failed,
        }
    }
}
