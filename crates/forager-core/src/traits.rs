use std::future::Future;

use uuid::Uuid;

use crate::error::AppError;
use crate::posting::NewJob;
use crate::run::{RunStatus, ScrapeRun};
use crate::source::Source;

/// Reads sources and records run outcomes on them.
///
/// Only the orchestrator calls the `mark_*` methods; source creation and
/// deletion belong to source management outside the pipeline.
pub trait SourceStore: Send + Sync + Clone {
    fn get_source(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Source>, AppError>> + Send;

    /// Set `last_status = running` and stamp `last_run_at`.
    fn mark_running(&self, id: Uuid) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Set `last_status = success` and clear `last_error`.
    fn mark_succeeded(&self, id: Uuid) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Set `last_status = error` with the message recorded.
    fn mark_failed(
        &self,
        id: Uuid,
        error: &str,
    ) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Persists scrape runs and their ordered diagnostic logs.
///
/// Implementations must serialize `append_log` per run id (an atomic
/// array append in SQL, a mutex in the mock) so concurrent appends never
/// lose entries.
pub trait RunStore: Send + Sync + Clone {
    /// Create a run in `running` with its first log entry. Returns the run id.
    fn create_run(
        &self,
        source_id: Uuid,
        first_entry: &str,
    ) -> impl Future<Output = Result<Uuid, AppError>> + Send;

    fn append_log(
        &self,
        run_id: Uuid,
        entry: &str,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Finalize a run exactly once: set the terminal status, counts,
    /// completion timestamp, and optional error message.
    fn finalize_run(
        &self,
        run_id: Uuid,
        status: RunStatus,
        jobs_found: u32,
        jobs_inserted: u32,
        error_message: Option<&str>,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Most recent runs for a source, newest first.
    fn recent_runs(
        &self,
        source_id: Uuid,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ScrapeRun>, AppError>> + Send;
}

/// Persists accepted postings. No deduplication: re-scraping the same
/// upstream item creates a new row each time.
pub trait JobStore: Send + Sync + Clone {
    fn insert_job(&self, job: &NewJob) -> impl Future<Output = Result<Uuid, AppError>> + Send;
}

/// Appends diagnostics to one run's log.
///
/// Append failures are swallowed with a warning: observability must never
/// abort a run.
#[derive(Clone)]
pub struct RunLogger<R: RunStore> {
    store: R,
    run_id: Uuid,
}

impl<R: RunStore> RunLogger<R> {
    pub fn new(store: R, run_id: Uuid) -> Self {
        Self { store, run_id }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub async fn log(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(run_id = %self.run_id, "{message}");
        if let Err(e) = self.store.append_log(self.run_id, &message).await {
            tracing::warn!(run_id = %self.run_id, error = %e, "Failed to append run log entry");
        }
    }
}
