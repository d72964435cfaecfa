use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::application::ApplicationRecord;
use crate::models::job::JobRecord;
use crate::notifications::dispatcher::NotificationDispatcher;
use crate::notifications::models::{
    DispatchRequest, FireOutcome, NewTask, NotificationTask, ScheduleOutcome, ScheduleStatus,
};
use crate::notifications::store::{ApplicationStore, JobStore, TaskQueue, TemplateStore};
use crate::notifications::template::{self, TemplateValues, DEFAULT_QUALIFIED_TEMPLATE};
use crate::notifications::{NotificationConfig, SchedulingError, StoreError, CATEGORY_QUALIFIED};

const DATE_FORMAT: &str = "%B %-d, %Y";

/// Schedules and fires qualified-candidate notifications.
///
/// Scheduling writes a pending task row; a worker later claims it through
/// [`NotificationScheduler::fire_next`]. Both sides check the application's
/// notified flag, and the task queue guarantees one live task per application.
pub struct NotificationScheduler {
    jobs: Arc<dyn JobStore>,
    applications: Arc<dyn ApplicationStore>,
    templates: Arc<dyn TemplateStore>,
    queue: Arc<dyn TaskQueue>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    config: NotificationConfig,
}

impl NotificationScheduler {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        applications: Arc<dyn ApplicationStore>,
        templates: Arc<dyn TemplateStore>,
        queue: Arc<dyn TaskQueue>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            jobs,
            applications,
            templates,
            queue,
            dispatcher,
            config,
        }
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// Enqueues a notification for a qualified application, unless the job has
    /// auto-notify off, the candidate was already notified, or a task is already live.
    pub async fn on_qualified(
        &self,
        application_id: Uuid,
        job_id: Uuid,
        delay: Duration,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let job = self.load_job(job_id).await?;
        if !job.auto_notify {
            info!("Application {application_id}: auto-notify disabled for job {job_id}, not scheduling");
            return Ok(ScheduleOutcome::skipped(ScheduleStatus::SkippedDisabled));
        }

        let application = self.load_application(application_id).await?;
        if application.job_id != job_id {
            return Err(SchedulingError::JobMismatch {
                application_id,
                requested: job_id,
                actual: application.job_id,
            });
        }
        if application.notified {
            info!("Application {application_id}: candidate already notified, not scheduling");
            return Ok(ScheduleOutcome::skipped(ScheduleStatus::SkippedDuplicate));
        }

        let delay_secs = i64::try_from(delay.as_secs()).map_err(|_| SchedulingError::InvalidDelay)?;
        let scheduled_at = Utc::now();
        let run_at = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|d| scheduled_at.checked_add_signed(d))
            .ok_or(SchedulingError::InvalidDelay)?;

        let task = NewTask {
            application_id,
            job_id,
            delay_secs,
            scheduled_at,
            run_at,
        };

        match self.queue.enqueue(task).await? {
            Some(task) => {
                info!(
                    "Application {application_id}: qualified notification scheduled (task {}, run at {})",
                    task.id, task.run_at
                );
                Ok(ScheduleOutcome::scheduled(&task))
            }
            None => {
                info!("Application {application_id}: notification already pending, duplicate suppressed");
                Ok(ScheduleOutcome::skipped(ScheduleStatus::SkippedDuplicate))
            }
        }
    }

    /// Claims and fires the next due task, if any. Store errors on the claim or
    /// the final status write are returned; everything else ends in a task status.
    pub async fn fire_next(
        &self,
        worker_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<FireOutcome>, StoreError> {
        let Some(task) = self.queue.claim_due(worker_id, now).await? else {
            return Ok(None);
        };

        info!(
            "Worker {worker_id} claimed notification task {} for application {} (attempt {})",
            task.id, task.application_id, task.attempts
        );

        let outcome = match self.fire(&task, now).await {
            Ok(outcome) => outcome,
            Err(err) => FireOutcome::Failed(err.to_string()),
        };

        let last_error = match &outcome {
            FireOutcome::Failed(reason) => {
                error!(
                    "Notification task {} for application {} failed after {} attempts: {reason}",
                    task.id, task.application_id, task.attempts
                );
                Some(reason.as_str())
            }
            _ => None,
        };

        self.queue
            .finish(task.id, outcome.task_status(), last_error, now)
            .await?;

        Ok(Some(outcome))
    }

    /// Returns orphaned claims to the queue.
    pub async fn requeue_stale(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let window = chrono::Duration::from_std(self.config.stale_claim_after)
            .unwrap_or_else(|_| chrono::Duration::minutes(10));
        self.queue.requeue_stale(now - window).await
    }

    async fn fire(
        &self,
        task: &NotificationTask,
        now: DateTime<Utc>,
    ) -> Result<FireOutcome, SchedulingError> {
        let application = self.load_application(task.application_id).await?;
        if application.notified {
            info!(
                "Notification task {}: application {} notified since scheduling, skipping",
                task.id, application.id
            );
            return Ok(FireOutcome::SkippedDuplicate);
        }

        let job = self.load_job(task.job_id).await?;
        let template = match self.templates.get_template(job.id, CATEGORY_QUALIFIED).await? {
            Some(content) => content,
            None => {
                warn!("Job {}: no '{CATEGORY_QUALIFIED}' template found, using built-in default", job.id);
                DEFAULT_QUALIFIED_TEMPLATE.to_string()
            }
        };

        let rendered = template::render(&template, &self.template_values(&job, &application, now));
        let unreplaced = template::unreplaced_tokens(&rendered);
        if !unreplaced.is_empty() {
            warn!(
                "Notification task {}: message dispatched with unreplaced placeholders {:?}",
                task.id, unreplaced
            );
        }

        let Some(candidate_email) = application
            .candidate_email
            .clone()
            .filter(|email| !email.trim().is_empty())
        else {
            return Ok(FireOutcome::Failed(
                "application has no candidate email".to_string(),
            ));
        };

        let request = DispatchRequest {
            candidate_name: application.candidate_name.clone().unwrap_or_default(),
            candidate_email,
            job_title: job.title.clone(),
            company_name: job.company_name.clone().unwrap_or_default(),
            rendered_message: rendered,
            category: CATEGORY_QUALIFIED.to_string(),
        };

        if let Err(err) = self.dispatcher.dispatch(&request).await {
            return Ok(FireOutcome::Failed(err.to_string()));
        }

        // The message is out; a failure below must not turn this into a retryable failure.
        match self.applications.mark_notified(application.id, now).await {
            Ok(true) => {}
            Ok(false) => warn!(
                "Application {}: notified flag was already set when dispatch completed",
                application.id
            ),
            Err(err) => error!(
                "Application {}: notification sent but notified flag not persisted: {err}",
                application.id
            ),
        }

        info!(
            "Notification task {}: qualified notification dispatched for application {}",
            task.id, application.id
        );
        Ok(FireOutcome::Fired)
    }

    fn template_values(
        &self,
        job: &JobRecord,
        application: &ApplicationRecord,
        now: DateTime<Utc>,
    ) -> TemplateValues {
        TemplateValues {
            candidate_name: application.candidate_name.clone(),
            job_title: Some(job.title.clone()),
            role_name: job.role_name.clone().or_else(|| Some(job.title.clone())),
            company_name: job.company_name.clone(),
            meeting_link: self.config.meeting_link.clone(),
            date: Some(now.format(DATE_FORMAT).to_string()),
            sender_name: self.config.sender_name.clone(),
            sender_title: self.config.sender_title.clone(),
            sender_designation: self.config.sender_designation.clone(),
        }
    }

    async fn load_job(&self, job_id: Uuid) -> Result<JobRecord, SchedulingError> {
        self.jobs
            .get_job(job_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound(format!("job {job_id}")))
    }

    async fn load_application(&self, application_id: Uuid) -> Result<ApplicationRecord, SchedulingError> {
        self.applications
            .get_application(application_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound(format!("application {application_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::fakes::{
        sample_application, sample_job, test_config, MemoryDispatcher, MemoryStore,
    };
    use crate::notifications::models::TaskStatus;

    struct Harness {
        store: Arc<MemoryStore>,
        dispatcher: Arc<MemoryDispatcher>,
        scheduler: Arc<NotificationScheduler>,
        job_id: Uuid,
        application_id: Uuid,
    }

    fn harness(auto_notify: bool) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = Arc::new(MemoryDispatcher::new());
        let job = sample_job(auto_notify);
        let application = sample_application(job.id);
        let (job_id, application_id) = (job.id, application.id);
        store.insert_job(job);
        store.insert_application(application);

        let scheduler = Arc::new(NotificationScheduler::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            dispatcher.clone(),
            test_config(),
        ));

        Harness {
            store,
            dispatcher,
            scheduler,
            job_id,
            application_id,
        }
    }

    fn after_delay() -> DateTime<Utc> {
        Utc::now() + chrono::Duration::seconds(301)
    }

    const DELAY: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn test_on_qualified_creates_pending_task() {
        let h = harness(true);
        let outcome = h
            .scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();

        assert!(outcome.scheduled);
        assert_eq!(outcome.status, ScheduleStatus::Pending);
        let tasks = h.store.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::Pending.as_str());
        assert_eq!(tasks[0].delay_secs, 300);
        assert_eq!(Some(tasks[0].id), outcome.task_id);
    }

    #[tokio::test]
    async fn test_auto_notify_disabled_creates_no_task() {
        let h = harness(false);
        let outcome = h
            .scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();

        assert!(!outcome.scheduled);
        assert_eq!(outcome.status, ScheduleStatus::SkippedDisabled);
        assert!(h.store.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_already_notified_is_noop() {
        let h = harness(true);
        h.store.set_notified(h.application_id);

        let outcome = h
            .scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();

        assert!(!outcome.scheduled);
        assert_eq!(outcome.status, ScheduleStatus::SkippedDuplicate);
        assert!(h.store.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_double_on_qualified_dispatches_once() {
        let h = harness(true);
        let first = h
            .scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();
        let second = h
            .scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();

        assert!(first.scheduled);
        assert!(!second.scheduled);
        assert_eq!(second.status, ScheduleStatus::SkippedDuplicate);

        let fired = h.scheduler.fire_next("w1", after_delay()).await.unwrap();
        assert_eq!(fired, Some(FireOutcome::Fired));
        assert_eq!(h.scheduler.fire_next("w1", after_delay()).await.unwrap(), None);
        assert_eq!(h.dispatcher.sent().len(), 1);
        assert!(h.store.application(h.application_id).unwrap().notified);
    }

    #[tokio::test]
    async fn test_task_not_fired_before_delay() {
        let h = harness(true);
        h.scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();

        assert_eq!(h.scheduler.fire_next("w1", Utc::now()).await.unwrap(), None);
        assert!(h.dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_workers_dispatch_once() {
        let h = harness(true);
        h.scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();

        let now = after_delay();
        let (a, b) = tokio::join!(
            h.scheduler.fire_next("w1", now),
            h.scheduler.fire_next("w2", now)
        );
        let outcomes: Vec<_> = [a.unwrap(), b.unwrap()].into_iter().flatten().collect();

        assert_eq!(outcomes, vec![FireOutcome::Fired]);
        assert_eq!(h.dispatcher.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_flag_set_before_fire_skips_dispatch() {
        let h = harness(true);
        h.scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();
        h.store.set_notified(h.application_id);

        let outcome = h.scheduler.fire_next("w1", after_delay()).await.unwrap();

        assert_eq!(outcome, Some(FireOutcome::SkippedDuplicate));
        assert!(h.dispatcher.sent().is_empty());
        assert_eq!(h.store.tasks()[0].status, TaskStatus::SkippedDuplicate.as_str());
    }

    #[tokio::test]
    async fn test_dispatch_failure_leaves_flag_unset_and_allows_reschedule() {
        let h = harness(true);
        h.dispatcher.set_failing(true);
        h.scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();

        let outcome = h.scheduler.fire_next("w1", after_delay()).await.unwrap();
        assert!(matches!(outcome, Some(FireOutcome::Failed(_))));
        assert!(!h.store.application(h.application_id).unwrap().notified);

        let task = &h.store.tasks()[0];
        assert_eq!(task.status, TaskStatus::Failed.as_str());
        assert!(task.last_error.is_some());

        h.dispatcher.set_failing(false);
        let retry = h
            .scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();
        assert!(retry.scheduled);
        assert_eq!(
            h.scheduler.fire_next("w1", after_delay()).await.unwrap(),
            Some(FireOutcome::Fired)
        );
        assert_eq!(h.dispatcher.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_fire_renders_job_specific_template() {
        let h = harness(true);
        h.store
            .insert_template(None, CATEGORY_QUALIFIED, "global for [Candidate Name]");
        h.store.insert_template(
            Some(h.job_id),
            CATEGORY_QUALIFIED,
            "Hi [Candidate Name], [Company Name] liked you for [Role Name]. [Your Name]",
        );
        h.scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();
        h.scheduler.fire_next("w1", after_delay()).await.unwrap();

        let sent = h.dispatcher.sent();
        assert_eq!(
            sent[0].rendered_message,
            "Hi Priya Natarajan, Lumen Analytics liked you for Data Engineer. Chris Doe"
        );
        assert_eq!(sent[0].candidate_email, "priya@example.com");
        assert_eq!(sent[0].category, CATEGORY_QUALIFIED);
    }

    #[tokio::test]
    async fn test_fire_falls_back_to_default_template() {
        let h = harness(true);
        h.scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();
        h.scheduler.fire_next("w1", after_delay()).await.unwrap();

        let sent = h.dispatcher.sent();
        assert!(sent[0].rendered_message.starts_with("Dear Priya Natarajan,"));
        assert!(!sent[0].rendered_message.contains("[Date]"));
    }

    #[tokio::test]
    async fn test_missing_email_fails_task_without_dispatch() {
        let h = harness(true);
        h.store.clear_email(h.application_id);
        h.scheduler
            .on_qualified(h.application_id, h.job_id, DELAY)
            .await
            .unwrap();

        let outcome = h.scheduler.fire_next("w1", after_delay()).await.unwrap();
        assert!(matches!(outcome, Some(FireOutcome::Failed(_))));
        assert!(h.dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_application_is_not_found() {
        let h = harness(true);
        let err = h
            .scheduler
            .on_qualified(Uuid::new_v4(), h.job_id, DELAY)
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mismatched_job_is_rejected() {
        let h = harness(true);
        let other = sample_job(true);
        let other_id = other.id;
        h.store.insert_job(other);

        let err = h
            .scheduler
            .on_qualified(h.application_id, other_id, DELAY)
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::JobMismatch { .. }));
    }

    #[tokio::test]
    async fn test_requeue_stale_returns_old_claims_to_pending() {
        let h = harness(true);
        h.scheduler
            .on_qualified(h.application_id, h.job_id, Duration::ZERO)
            .await
            .unwrap();
        let claimed_at = Utc::now() - chrono::Duration::minutes(30);
        h.store.claim_all("dead-worker", claimed_at);

        let requeued = h.scheduler.requeue_stale(Utc::now()).await.unwrap();

        assert_eq!(requeued, 1);
        assert_eq!(h.store.tasks()[0].status, TaskStatus::Pending.as_str());
        assert_eq!(
            h.scheduler.fire_next("w2", Utc::now()).await.unwrap(),
            Some(FireOutcome::Fired)
        );
    }

    #[tokio::test]
    async fn test_requeue_stale_ignores_fresh_claims() {
        let h = harness(true);
        h.scheduler
            .on_qualified(h.application_id, h.job_id, Duration::ZERO)
            .await
            .unwrap();
        h.store.claim_all("busy-worker", Utc::now());

        assert_eq!(h.scheduler.requeue_stale(Utc::now()).await.unwrap(), 0);
        assert_eq!(h.store.tasks()[0].status, TaskStatus::Claimed.as_str());
    }
}
