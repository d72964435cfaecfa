use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::notifications::models::QualificationEvent;
use crate::notifications::store::{ApplicationStore, JobStore};
use crate::notifications::{NotificationScheduler, ScheduleOutcome};
use crate::qualification::QualificationError;
use crate::scoring::{EvaluationContext, EvaluationResult, ScoringEngine};

/// What happened to one application: the verdict, plus the notification
/// acknowledgement when the verdict was qualified.
#[derive(Debug, Clone, Serialize)]
pub struct QualificationOutcome {
    pub evaluation: EvaluationResult,
    pub event: Option<QualificationEvent>,
    pub notification: Option<ScheduleOutcome>,
    /// Set when scheduling failed. The qualification itself still stands.
    pub notification_error: Option<String>,
}

pub struct QualificationOrchestrator {
    scoring: Arc<ScoringEngine>,
    jobs: Arc<dyn JobStore>,
    applications: Arc<dyn ApplicationStore>,
    scheduler: Arc<NotificationScheduler>,
}

impl QualificationOrchestrator {
    pub fn new(
        scoring: Arc<ScoringEngine>,
        jobs: Arc<dyn JobStore>,
        applications: Arc<dyn ApplicationStore>,
        scheduler: Arc<NotificationScheduler>,
    ) -> Self {
        Self {
            scoring,
            jobs,
            applications,
            scheduler,
        }
    }

    /// Scores the application, records the verdict, and schedules the
    /// qualified-candidate notification when it passes.
    ///
    /// Scoring and recording errors propagate. Scheduling errors are logged and
    /// reported in `notification_error`; they never undo the qualification.
    pub async fn qualify(
        &self,
        application_id: Uuid,
        resume_text: &str,
        job_description: &str,
        threshold: Option<f64>,
        context: Option<&EvaluationContext>,
    ) -> Result<QualificationOutcome, QualificationError> {
        let application = self
            .applications
            .get_application(application_id)
            .await?
            .ok_or_else(|| QualificationError::NotFound(format!("application {application_id}")))?;

        let job = self
            .jobs
            .get_job(application.job_id)
            .await?
            .ok_or_else(|| QualificationError::NotFound(format!("job {}", application.job_id)))?;

        // Without caller context, the job record is the best description of the role.
        let job_context = EvaluationContext {
            job_title: Some(job.title.clone()),
            company_name: job.company_name.clone(),
            notes: None,
        };
        let context = context.unwrap_or(&job_context);

        let threshold = threshold.unwrap_or(self.scoring.config().default_threshold);
        let evaluation = self
            .scoring
            .evaluate(resume_text, job_description, threshold, Some(context))
            .await?;

        self.applications
            .record_evaluation(application_id, &evaluation)
            .await?;

        info!(
            "Application {application_id}: evaluation recorded (score {}, qualified: {}, threshold {threshold})",
            evaluation.overall.score_percent, evaluation.overall.qualified
        );

        if !evaluation.overall.qualified {
            return Ok(QualificationOutcome {
                evaluation,
                event: None,
                notification: None,
                notification_error: None,
            });
        }

        let event = QualificationEvent {
            application_id,
            job_id: job.id,
            score: evaluation.overall.score_percent,
            qualified: true,
            timestamp: Utc::now(),
        };

        let delay = self.scheduler.config().delay;
        let (notification, notification_error) = match self
            .scheduler
            .on_qualified(application_id, job.id, delay)
            .await
        {
            Ok(outcome) => (Some(outcome), None),
            Err(err) => {
                error!("Application {application_id}: qualified but notification not scheduled: {err}");
                (None, Some(err.to_string()))
            }
        };

        Ok(QualificationOutcome {
            evaluation,
            event: Some(event),
            notification,
            notification_error,
        })
    }
}
