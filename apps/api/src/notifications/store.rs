//! Collaborator stores behind traits, plus the Postgres implementation.
//!
//! `jobs`, `applications` and `message_templates` belong to other services and
//! are only read (or narrowly updated) here. `notification_tasks` is ours.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::application::{ApplicationRecord, STATUS_NOT_QUALIFIED, STATUS_QUALIFIED};
use crate::models::job::JobRecord;
use crate::notifications::models::{NewTask, NotificationTask, TaskStatus};
use crate::notifications::StoreError;
use crate::scoring::EvaluationResult;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get_job(&self, job_id: Uuid) -> StoreResult<Option<JobRecord>>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn get_application(&self, application_id: Uuid) -> StoreResult<Option<ApplicationRecord>>;

    /// Persists score, verdict and payload, and advances the application status.
    async fn record_evaluation(
        &self,
        application_id: Uuid,
        result: &EvaluationResult,
    ) -> StoreResult<()>;

    /// Sets the notified flag only if it is still unset. Returns false when
    /// another path got there first.
    async fn mark_notified(&self, application_id: Uuid, at: DateTime<Utc>) -> StoreResult<bool>;
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Job-specific template first, then the global one for the category.
    async fn get_template(&self, job_id: Uuid, category: &str) -> StoreResult<Option<String>>;
}

#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Inserts a pending task unless a live one exists for the application.
    /// `None` means a live task already exists.
    async fn enqueue(&self, task: NewTask) -> StoreResult<Option<NotificationTask>>;

    /// Atomically moves the oldest due pending task to `claimed` for `worker_id`.
    async fn claim_due(
        &self,
        worker_id: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<NotificationTask>>;

    async fn finish(
        &self,
        task_id: Uuid,
        status: TaskStatus,
        error: Option<&str>,
        at: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// Returns tasks claimed before `claimed_before` to `pending`.
    async fn requeue_stale(&self, claimed_before: DateTime<Utc>) -> StoreResult<u64>;
}

/// Postgres-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn get_job(&self, job_id: Uuid) -> StoreResult<Option<JobRecord>> {
        Ok(sqlx::query_as::<_, JobRecord>(
            "SELECT id, title, role_name, company_name, auto_notify FROM jobs WHERE id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn get_application(&self, application_id: Uuid) -> StoreResult<Option<ApplicationRecord>> {
        Ok(sqlx::query_as::<_, ApplicationRecord>(
            r#"
            SELECT id, job_id, status, candidate_name, candidate_email, notified, notified_at
            FROM applications
            WHERE id = $1
            "#,
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn record_evaluation(
        &self,
        application_id: Uuid,
        result: &EvaluationResult,
    ) -> StoreResult<()> {
        let payload = serde_json::to_value(result)?;
        let status = if result.overall.qualified {
            STATUS_QUALIFIED
        } else {
            STATUS_NOT_QUALIFIED
        };

        let updated = sqlx::query(
            r#"
            UPDATE applications
            SET qualification_score = $2,
                is_qualified = $3,
                evaluation = $4,
                status = $5
            WHERE id = $1
            "#,
        )
        .bind(application_id)
        .bind(i32::from(result.overall.score_percent))
        .bind(result.overall.qualified)
        .bind(payload)
        .bind(status)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::Unavailable(format!(
                "application {application_id} disappeared before its evaluation was recorded"
            )));
        }
        Ok(())
    }

    async fn mark_notified(&self, application_id: Uuid, at: DateTime<Utc>) -> StoreResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE applications
            SET notified = TRUE,
                notified_at = $2
            WHERE id = $1 AND notified = FALSE
            "#,
        )
        .bind(application_id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(updated.rows_affected() == 1)
    }
}

#[async_trait]
impl TemplateStore for PgStore {
    async fn get_template(&self, job_id: Uuid, category: &str) -> StoreResult<Option<String>> {
        Ok(sqlx::query_scalar::<_, String>(
            r#"
            SELECT content
            FROM message_templates
            WHERE category = $2 AND (job_id = $1 OR job_id IS NULL)
            ORDER BY job_id NULLS LAST
            LIMIT 1
            "#,
        )
        .bind(job_id)
        .bind(category)
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[async_trait]
impl TaskQueue for PgStore {
    async fn enqueue(&self, task: NewTask) -> StoreResult<Option<NotificationTask>> {
        // The partial unique index on live tasks turns a racing second insert into a no-op.
        Ok(sqlx::query_as::<_, NotificationTask>(
            r#"
            INSERT INTO notification_tasks
                (id, application_id, job_id, status, delay_secs, scheduled_at, run_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (application_id) WHERE status IN ('pending', 'claimed') DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(task.application_id)
        .bind(task.job_id)
        .bind(TaskStatus::Pending.as_str())
        .bind(task.delay_secs)
        .bind(task.scheduled_at)
        .bind(task.run_at)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn claim_due(
        &self,
        worker_id: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<NotificationTask>> {
        Ok(sqlx::query_as::<_, NotificationTask>(
            r#"
            UPDATE notification_tasks
            SET status = $2,
                claimed_by = $1,
                claimed_at = $4,
                attempts = attempts + 1
            WHERE id = (
                SELECT id FROM notification_tasks
                WHERE status = $3 AND run_at <= $4
                ORDER BY run_at
                FOR UPDATE SKIP LOCKED
                LIMIT 1
            )
            RETURNING *
            "#,
        )
        .bind(worker_id)
        .bind(TaskStatus::Claimed.as_str())
        .bind(TaskStatus::Pending.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn finish(
        &self,
        task_id: Uuid,
        status: TaskStatus,
        error: Option<&str>,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE notification_tasks
            SET status = $2,
                last_error = $3,
                fired_at = COALESCE($5, fired_at),
                completed_at = $4
            WHERE id = $1
            "#,
        )
        .bind(task_id)
        .bind(status.as_str())
        .bind(error)
        .bind(at)
        .bind((status == TaskStatus::Fired).then_some(at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn requeue_stale(&self, claimed_before: DateTime<Utc>) -> StoreResult<u64> {
        let updated = sqlx::query(
            r#"
            UPDATE notification_tasks
            SET status = $1,
                claimed_by = NULL,
                claimed_at = NULL
            WHERE status = $2 AND claimed_at < $3
            "#,
        )
        .bind(TaskStatus::Pending.as_str())
        .bind(TaskStatus::Claimed.as_str())
        .bind(claimed_before)
        .execute(&self.pool)
        .await?;

        Ok(updated.rows_affected())
    }
}
