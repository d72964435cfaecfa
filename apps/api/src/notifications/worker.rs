use std::sync::Arc;

use chrono::Utc;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use crate::notifications::NotificationScheduler;

const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Notification worker loop. Runs until the task is dropped.
///
/// Re-queues orphaned claims once at startup, then claims and fires due tasks,
/// sleeping for the poll interval whenever the queue is empty.
pub async fn run_notification_worker(scheduler: Arc<NotificationScheduler>, worker_id: String) {
    info!("Notification worker {worker_id} starting");

    match scheduler.requeue_stale(Utc::now()).await {
        Ok(0) => {}
        Ok(requeued) => warn!("Worker {worker_id}: re-queued {requeued} stale notification claims"),
        Err(err) => error!("Worker {worker_id}: failed to re-queue stale claims: {err}"),
    }

    let idle = scheduler.config().poll_interval;

    loop {
        match scheduler.fire_next(&worker_id, Utc::now()).await {
            Ok(Some(outcome)) => {
                debug!("Worker {worker_id}: notification task finished ({outcome:?})");
            }
            Ok(None) => sleep(idle).await,
            Err(err) => {
                error!("Worker {worker_id}: error while processing notification queue: {err}");
                sleep(ERROR_BACKOFF).await;
            }
        }
    }
}
