use uuid::Uuid;

use crate::classify::classify;
use crate::error::AppError;
use crate::filter::{ALLOWED_LOCATIONS, accept};
use crate::normalize::normalize;
use crate::posting::NewJob;
use crate::provider::{ActorProvider, FallbackProvider, ProviderChain};
use crate::run::{RunOutcome, RunStatus};
use crate::run_lock::RunLocks;
use crate::source::Source;
use crate::traits::{JobStore, RunLogger, RunStore, SourceStore};

/// Drives one run of one source: fetch → normalize → classify → filter →
/// persist → finalize, writing run-log entries and updating the source's
/// status record throughout.
///
/// Generic over all external dependencies via traits, enabling dependency
/// injection and testability without real provider or database calls.
pub struct ScrapeOrchestrator<P, B, S, R, J>
where
    P: ActorProvider,
    B: FallbackProvider,
    S: SourceStore,
    R: RunStore,
    J: JobStore,
{
    chain: ProviderChain<P, B>,
    sources: S,
    runs: R,
    jobs: J,
    locks: RunLocks,
}

impl<P, B, S, R, J> ScrapeOrchestrator<P, B, S, R, J>
where
    P: ActorProvider,
    B: FallbackProvider,
    S: SourceStore,
    R: RunStore,
    J: JobStore,
{
    pub fn new(chain: ProviderChain<P, B>, sources: S, runs: R, jobs: J, locks: RunLocks) -> Self {
        Self {
            chain,
            sources,
            runs,
            jobs,
            locks,
        }
    }

    /// Run the full pipeline for a source.
    ///
    /// An unknown source or a run already in flight is rejected before any
    /// run row is created. After that, every outcome finalizes the run row
    /// and the source's status record exactly once.
    pub async fn run_source(&self, source_id: Uuid) -> Result<RunOutcome, AppError> {
        let source = self
            .sources
            .get_source(source_id)
            .await?
            .ok_or(AppError::SourceNotFound(source_id))?;

        let _guard = self
            .locks
            .acquire(source_id)
            .ok_or(AppError::RunInProgress(source_id))?;

        let run_id = self.runs.create_run(source_id, "Starting scrape...").await?;

        // The run row exists from here on; any exit must finalize it so no
        // row is left in `running` without a completion timestamp.
        if let Err(err) = self.sources.mark_running(source_id).await {
            let message = err.to_string();
            if let Err(db_err) = self
                .runs
                .finalize_run(run_id, RunStatus::Error, 0, 0, Some(&message))
                .await
            {
                tracing::warn!(%run_id, error = %db_err, "Failed to finalize errored run");
            }
            return Err(err);
        }

        tracing::info!(%run_id, %source_id, source = %source.name, "Scrape run started");
        let logger = RunLogger::new(self.runs.clone(), run_id);

        match self.process(&source, &logger).await {
            Ok((jobs_found, jobs_inserted)) => {
                self.runs
                    .finalize_run(run_id, RunStatus::Success, jobs_found, jobs_inserted, None)
                    .await?;
                self.sources.mark_succeeded(source_id).await?;
                tracing::info!(%run_id, jobs_found, jobs_inserted, "Scrape run succeeded");
                Ok(RunOutcome {
                    run_id,
                    jobs_found,
                    jobs_inserted,
                })
            }
            Err((err, jobs_found, jobs_inserted)) => {
                let message = err.to_string();
                logger.log(format!("Error: {message}")).await;

                // Counts accumulated before the failure are preserved in
                // the run row; finalization failures must not mask the
                // original error.
                if let Err(db_err) = self
                    .runs
                    .finalize_run(
                        run_id,
                        RunStatus::Error,
                        jobs_found,
                        jobs_inserted,
                        Some(&message),
                    )
                    .await
                {
                    tracing::warn!(%run_id, error = %db_err, "Failed to finalize errored run");
                }
                if let Err(db_err) = self.sources.mark_failed(source_id, &message).await {
                    tracing::warn!(%source_id, error = %db_err, "Failed to record source error");
                }

                tracing::warn!(%run_id, error = %message, "Scrape run failed");
                Err(err)
            }
        }
    }

    /// Fetch and process items, returning `(jobs_found, jobs_inserted)`.
    /// Errors carry the counts accumulated before the failure.
    async fn process(
        &self,
        source: &Source,
        logger: &RunLogger<R>,
    ) -> Result<(u32, u32), (AppError, u32, u32)> {
        let report = self
            .chain
            .fetch(source, logger)
            .await
            .map_err(|e| (e, 0, 0))?;

        let jobs_found = report.items.len() as u32;
        logger
            .log(format!("Processing {jobs_found} potential jobs"))
            .await;

        let mut jobs_inserted = 0u32;
        for item in &report.items {
            let raw = normalize(item, &source.url);
            let posting = classify(&raw, &source.url);

            if !accept(&posting, &source.url) {
                continue;
            }

            let job = NewJob::from_classified(&posting, source.id, &source.name, ALLOWED_LOCATIONS);
            match self.jobs.insert_job(&job).await {
                Ok(job_id) => {
                    jobs_inserted += 1;
                    tracing::debug!(%job_id, title = %job.title, "Inserted job");
                }
                // A single failed insert does not abort the run; the item
                // is simply not counted.
                Err(e) => {
                    tracing::warn!(title = %job.title, error = %e, "Failed to insert job, skipping");
                }
            }
        }

        logger
            .log(format!("Inserted {jobs_inserted} jobs after filtering"))
            .await;

        Ok((jobs_found, jobs_inserted))
    }
}
