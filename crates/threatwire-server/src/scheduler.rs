//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring pipeline run.

use std::sync::Arc;

use threatwire_pipeline::Pipeline;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::run_guard::RunGuard;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    pipeline: Arc<Pipeline>,
    runs: RunGuard,
    schedule: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_pipeline_job(&scheduler, pipeline, runs, schedule).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the pipeline run on `schedule` (six-field cron, seconds first).
/// A tick that fires while a run is still active is skipped.
async fn register_pipeline_job(
    scheduler: &JobScheduler,
    pipeline: Arc<Pipeline>,
    runs: RunGuard,
    schedule: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let pipeline = Arc::clone(&pipeline);
        let runs = runs.clone();

        Box::pin(async move {
            let Some(_permit) = runs.try_acquire() else {
                tracing::warn!("scheduler: previous pipeline run still active; skipping tick");
                return;
            };

            tracing::info!("scheduler: starting pipeline run");
            let report = pipeline.run_once().await;
            tracing::info!(
                stored = report.articles_succeeded,
                failed = report.articles_failed,
                duplicates = report.articles_skipped_duplicate,
                "scheduler: pipeline run complete"
            );
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(schedule, "scheduler: pipeline run registered");
    Ok(())
}
