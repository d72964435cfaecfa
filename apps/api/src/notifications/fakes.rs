//! In-memory fakes for the store and dispatcher traits (testing only).
//!
//! `MemoryStore` implements every store trait behind one set of mutexes, so the
//! live-task check in `enqueue` and the claim in `claim_due` are atomic the same
//! way the Postgres statements are.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::application::{ApplicationRecord, STATUS_NOT_QUALIFIED, STATUS_QUALIFIED};
use crate::models::job::JobRecord;
use crate::notifications::dispatcher::NotificationDispatcher;
use crate::notifications::models::{DispatchRequest, NewTask, NotificationTask, TaskStatus};
use crate::notifications::store::{ApplicationStore, JobStore, StoreResult, TaskQueue, TemplateStore};
use crate::notifications::{DispatchError, NotificationConfig, StoreError};
use crate::scoring::EvaluationResult;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn sample_job(auto_notify: bool) -> JobRecord {
    JobRecord {
        id: Uuid::new_v4(),
        title: "Data Engineer".to_string(),
        role_name: None,
        company_name: Some("Lumen Analytics".to_string()),
        auto_notify,
    }
}

pub fn sample_application(job_id: Uuid) -> ApplicationRecord {
    ApplicationRecord {
        id: Uuid::new_v4(),
        job_id,
        status: "applied".to_string(),
        candidate_name: Some("Priya Natarajan".to_string()),
        candidate_email: Some("priya@example.com".to_string()),
        notified: false,
        notified_at: None,
    }
}

pub fn test_config() -> NotificationConfig {
    NotificationConfig {
        delay: Duration::from_secs(300),
        poll_interval: Duration::from_secs(5),
        stale_claim_after: Duration::from_secs(600),
        webhook_url: "http://localhost:9/notify".to_string(),
        sender_name: Some("Chris Doe".to_string()),
        sender_title: Some("Talent Partner".to_string()),
        sender_designation: Some("Recruitment".to_string()),
        meeting_link: Some("https://meet.example.com/screening".to_string()),
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    jobs: Mutex<HashMap<Uuid, JobRecord>>,
    applications: Mutex<HashMap<Uuid, ApplicationRecord>>,
    evaluations: Mutex<HashMap<Uuid, EvaluationResult>>,
    templates: Mutex<HashMap<(Option<Uuid>, String), String>>,
    tasks: Mutex<HashMap<Uuid, NotificationTask>>,
    fail_enqueue: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_job(&self, job: JobRecord) {
        self.jobs.lock().unwrap().insert(job.id, job);
    }

    pub fn insert_application(&self, application: ApplicationRecord) {
        self.applications
            .lock()
            .unwrap()
            .insert(application.id, application);
    }

    pub fn insert_template(&self, job_id: Option<Uuid>, category: &str, content: &str) {
        self.templates
            .lock()
            .unwrap()
            .insert((job_id, category.to_string()), content.to_string());
    }

    pub fn application(&self, id: Uuid) -> Option<ApplicationRecord> {
        self.applications.lock().unwrap().get(&id).cloned()
    }

    pub fn evaluation(&self, id: Uuid) -> Option<EvaluationResult> {
        self.evaluations.lock().unwrap().get(&id).cloned()
    }

    pub fn set_notified(&self, id: Uuid) {
        if let Some(app) = self.applications.lock().unwrap().get_mut(&id) {
            app.notified = true;
            app.notified_at = Some(Utc::now());
        }
    }

    pub fn clear_email(&self, id: Uuid) {
        if let Some(app) = self.applications.lock().unwrap().get_mut(&id) {
            app.candidate_email = None;
        }
    }

    /// Makes every subsequent `enqueue` fail with a store error.
    pub fn fail_enqueue(&self, fail: bool) {
        self.fail_enqueue.store(fail, Ordering::SeqCst);
    }

    /// Tasks ordered by scheduling time.
    pub fn tasks(&self) -> Vec<NotificationTask> {
        let mut tasks: Vec<_> = self.tasks.lock().unwrap().values().cloned().collect();
        tasks.sort_by_key(|t| t.scheduled_at);
        tasks
    }

    /// Simulates a worker that claimed every pending task and then went away.
    pub fn claim_all(&self, worker_id: &str, claimed_at: DateTime<Utc>) {
        for task in self.tasks.lock().unwrap().values_mut() {
            if task.status == TaskStatus::Pending.as_str() {
                task.status = TaskStatus::Claimed.as_str().to_string();
                task.claimed_by = Some(worker_id.to_string());
                task.claimed_at = Some(claimed_at);
                task.attempts += 1;
            }
        }
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn get_job(&self, job_id: Uuid) -> StoreResult<Option<JobRecord>> {
        Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn get_application(&self, application_id: Uuid) -> StoreResult<Option<ApplicationRecord>> {
        Ok(self.application(application_id))
    }

    async fn record_evaluation(
        &self,
        application_id: Uuid,
        result: &EvaluationResult,
    ) -> StoreResult<()> {
        let mut applications = self.applications.lock().unwrap();
        let app = applications.get_mut(&application_id).ok_or_else(|| {
            StoreError::Unavailable(format!("application {application_id} missing"))
        })?;
        app.status = if result.overall.qualified {
            STATUS_QUALIFIED
        } else {
            STATUS_NOT_QUALIFIED
        }
        .to_string();
        self.evaluations
            .lock()
            .unwrap()
            .insert(application_id, result.clone());
        Ok(())
    }

    async fn mark_notified(&self, application_id: Uuid, at: DateTime<Utc>) -> StoreResult<bool> {
        let mut applications = self.applications.lock().unwrap();
        match applications.get_mut(&application_id) {
            Some(app) if !app.notified => {
                app.notified = true;
                app.notified_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn get_template(&self, job_id: Uuid, category: &str) -> StoreResult<Option<String>> {
        let templates = self.templates.lock().unwrap();
        Ok(templates
            .get(&(Some(job_id), category.to_string()))
            .or_else(|| templates.get(&(None, category.to_string())))
            .cloned())
    }
}

#[async_trait]
impl TaskQueue for MemoryStore {
    async fn enqueue(&self, task: NewTask) -> StoreResult<Option<NotificationTask>> {
        if self.fail_enqueue.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("task queue offline".to_string()));
        }

        let mut tasks = self.tasks.lock().unwrap();
        let live_exists = tasks.values().any(|t| {
            t.application_id == task.application_id
                && t.task_status().is_some_and(|s| s.is_live())
        });
        if live_exists {
            return Ok(None);
        }

        let row = NotificationTask {
            id: Uuid::new_v4(),
            application_id: task.application_id,
            job_id: task.job_id,
            status: TaskStatus::Pending.as_str().to_string(),
            delay_secs: task.delay_secs,
            scheduled_at: task.scheduled_at,
            run_at: task.run_at,
            claimed_by: None,
            claimed_at: None,
            fired_at: None,
            completed_at: None,
            attempts: 0,
            last_error: None,
        };
        tasks.insert(row.id, row.clone());
        Ok(Some(row))
    }

    async fn claim_due(
        &self,
        worker_id: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<NotificationTask>> {
        let mut tasks = self.tasks.lock().unwrap();
        let next = tasks
            .values_mut()
            .filter(|t| t.status == TaskStatus::Pending.as_str() && t.run_at <= now)
            .min_by_key(|t| t.run_at);

        Ok(next.map(|task| {
            task.status = TaskStatus::Claimed.as_str().to_string();
            task.claimed_by = Some(worker_id.to_string());
            task.claimed_at = Some(now);
            task.attempts += 1;
            task.clone()
        }))
    }

    async fn finish(
        &self,
        task_id: Uuid,
        status: TaskStatus,
        error: Option<&str>,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(task) = tasks.get_mut(&task_id) {
            task.status = status.as_str().to_string();
            task.last_error = error.map(str::to_string);
            task.completed_at = Some(at);
            if status == TaskStatus::Fired {
                task.fired_at = Some(at);
            }
        }
        Ok(())
    }

    async fn requeue_stale(&self, claimed_before: DateTime<Utc>) -> StoreResult<u64> {
        let mut requeued = 0;
        for task in self.tasks.lock().unwrap().values_mut() {
            let stale = task.status == TaskStatus::Claimed.as_str()
                && task.claimed_at.is_some_and(|at| at < claimed_before);
            if stale {
                task.status = TaskStatus::Pending.as_str().to_string();
                task.claimed_by = None;
                task.claimed_at = None;
                requeued += 1;
            }
        }
        Ok(requeued)
    }
}

// ---------------------------------------------------------------------------
// MemoryDispatcher
// ---------------------------------------------------------------------------

/// Records every dispatch request; can be switched to reject them.
#[derive(Debug, Default)]
pub struct MemoryDispatcher {
    sent: Mutex<Vec<DispatchRequest>>,
    failing: AtomicBool,
}

impl MemoryDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<DispatchRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for MemoryDispatcher {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<(), DispatchError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DispatchError::Rejected {
                status: 503,
                body: "mail relay unavailable".to_string(),
            });
        }
        self.sent.lock().unwrap().push(request.clone());
        Ok(())
    }
}
