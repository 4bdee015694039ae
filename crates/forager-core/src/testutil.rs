//! Test utilities: mock implementations of the provider and store traits.
//!
//! Handwritten mocks for dependency injection in unit tests. All mocks use
//! `Arc<Mutex<_>>` for interior mutability, allowing test assertions on
//! recorded calls.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::posting::{ClassifiedPosting, ContractType, NewJob, RawPosting};
use crate::provider::{ActorProvider, FallbackProvider};
use crate::run::{RunStatus, ScrapeRun};
use crate::source::{SCRAPER_TYPE_APIFY_ACTOR, Source, SourceStatus};
use crate::traits::{JobStore, RunStore, SourceStore};

// ---------------------------------------------------------------------------
// MockActorProvider
// ---------------------------------------------------------------------------

/// Mock primary provider returning a configurable item batch.
#[derive(Clone)]
pub struct MockActorProvider {
    response: Arc<Mutex<Option<Result<Vec<Value>, AppError>>>>,
    /// Actor ids this provider was invoked with.
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockActorProvider {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            response: Arc::new(Mutex::new(Some(Ok(items)))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self {
            response: Arc::new(Mutex::new(Some(Err(error)))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ActorProvider for MockActorProvider {
    async fn run_actor(&self, actor_id: &str, _input: &Value) -> Result<Vec<Value>, AppError> {
        self.calls.lock().unwrap().push(actor_id.to_string());
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ---------------------------------------------------------------------------
// MockFallbackProvider
// ---------------------------------------------------------------------------

/// Mock fallback provider returning a configurable item batch.
#[derive(Clone)]
pub struct MockFallbackProvider {
    response: Arc<Mutex<Option<Result<Vec<Value>, AppError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockFallbackProvider {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            response: Arc::new(Mutex::new(Some(Ok(items)))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self {
            response: Arc::new(Mutex::new(Some(Err(error)))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl FallbackProvider for MockFallbackProvider {
    async fn extract(&self, url: &str) -> Result<Vec<Value>, AppError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ---------------------------------------------------------------------------
// MockSourceStore
// ---------------------------------------------------------------------------

///// Recorded status change: (source_id, status, error message).
pub type StatusChange = (Uuid, SourceStatus, Option<String>);

/// Mock source store backed by an in-memory Vec.
#[derive(Clone)]
pub struct MockSourceStore {
    sources: Arc<Mutex<Vec<Source>>>,
    pub status_changes: Arc<Mutex<Vec<StatusChange>>>,
    fail_mark_running: bool,
}

impl MockSourceStore {
    pub fn empty() -> Self {
        Self {
            sources: Arc::new(Mutex::new(Vec::new())),
            status_changes: Arc::new(Mutex::new(Vec::new())),
            fail_mark_running: false,
        }
    }

    pub fn with_source(source: Source) -> Self {
        Self {
            sources: Arc::new(Mutex::new(vec![source])),
            status_changes: Arc::new(Mutex::new(Vec::new())),
            fail_mark_running: false,
        }
    }

    /// Store whose `mark_running` fails with a database error.
    pub fn failing_mark_running(source: Source) -> Self {
        Self {
            fail_mark_running: true,
            ..Self::with_source(source)
        }
    }

    pub fn last_status(&self, id: Uuid) -> Option<SourceStatus> {
        self.sources
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.last_status)
    }

    pub fn last_error(&self, id: Uuid) -> Option<String> {
        self.sources
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.last_error.clone())
    }
}

impl SourceStore for MockSourceStore {
    async fn get_source(&self, id: Uuid) -> Result<Option<Source>, AppError> {
        Ok(self
            .sources
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn mark_running(&self, id: Uuid) -> Result<(), AppError> {
        if self.fail_mark_running {
            return Err(AppError::DatabaseError("connection reset".to_string()));
        }
        self.status_changes
            .lock()
            .unwrap()
            .push((id, SourceStatus::Running, None));
        let mut sources = self.sources.lock().unwrap();
        if let Some(source) = sources.iter_mut().find(|s| s.id == id) {
            source.last_status = SourceStatus::Running;
            source.last_run_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn mark_succeeded(&self, id: Uuid) -> Result<(), AppError> {
        self.status_changes
            .lock()
            .unwrap()
            .push((id, SourceStatus::Success, None));
        let mut sources = self.sources.lock().unwrap();
        if let Some(source) = sources.iter_mut().find(|s| s.id == id) {
            source.last_status = SourceStatus::Success;
            source.last_error = None;
        }
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), AppError> {
        self.status_changes
            .lock()
            .unwrap()
            .push((id, SourceStatus::Error, Some(error.to_string())));
        let mut sources = self.sources.lock().unwrap();
        if let Some(source) = sources.iter_mut().find(|s| s.id == id) {
            source.last_status = SourceStatus::Error;
            source.last_error = Some(error.to_string());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockRunStore
// ---------------------------------------------------------------------------

/// Mock run store; the shared mutex serializes log appends per run.
#[derive(Clone)]
pub struct MockRunStore {
    runs: Arc<Mutex<Vec<ScrapeRun>>>,
    create_error: Arc<Mutex<Option<AppError>>>,
}

impl MockRunStore {
    pub fn empty() -> Self {
        Self {
            runs: Arc::new(Mutex::new(Vec::new())),
            create_error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_create_error(error: AppError) -> Self {
        Self {
            runs: Arc::new(Mutex::new(Vec::new())),
            create_error: Arc::new(Mutex::new(Some(error))),
        }
    }

    pub fn runs(&self) -> Vec<ScrapeRun> {
        self.runs.lock().unwrap().clone()
    }

    /// Log entries across all runs, in append order.
    pub fn all_entries(&self) -> Vec<String> {
        self.runs
            .lock()
            .unwrap()
            .iter()
            .flat_map(|r| r.log_entries.clone())
            .collect()
    }
}

impl RunStore for MockRunStore {
    async fn create_run(&self, source_id: Uuid, first_entry: &str) -> Result<Uuid, AppError> {
        if let Some(e) = self.create_error.lock().unwrap().take() {
            return Err(e);
        }
        let run = ScrapeRun {
            id: Uuid::new_v4(),
            source_id,
            status: RunStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            jobs_found: 0,
            jobs_inserted: 0,
            error_message: None,
            log_entries: vec![first_entry.to_string()],
            created_at: Utc::now(),
        };
        let id = run.id;
        self.runs.lock().unwrap().push(run);
        Ok(id)
    }

    async fn append_log(&self, run_id: Uuid, entry: &str) -> Result<(), AppError> {
        let mut runs = self.runs.lock().unwrap();
        if let Some(run) = runs.iter_mut().find(|r| r.id == run_id) {
            run.log_entries.push(entry.to_string());
        } else {
            // Logger tests append to runs created elsewhere.
            runs.push(ScrapeRun {
                id: run_id,
                source_id: Uuid::nil(),
                status: RunStatus::Running,
                started_at: Utc::now(),
                completed_at: None,
                jobs_found: 0,
                jobs_inserted: 0,
                error_message: None,
                log_entries: vec![entry.to_string()],
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn finalize_run(
        &self,
        run_id: Uuid,
        status: RunStatus,
        jobs_found: u32,
        jobs_inserted: u32,
        error_message: Option<&str>,
    ) -> Result<(), AppError> {
        let mut runs = self.runs.lock().unwrap();
        if let Some(run) = runs.iter_mut().find(|r| r.id == run_id) {
            run.status = status;
            run.jobs_found = jobs_found;
            run.jobs_inserted = jobs_inserted;
            run.error_message = error_message.map(String::from);
            run.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn recent_runs(&self, source_id: Uuid, limit: usize) -> Result<Vec<ScrapeRun>, AppError> {
        let runs = self.runs.lock().unwrap();
        let mut matching: Vec<_> = runs
            .iter()
            .filter(|r| r.source_id == source_id)
            .cloned()
            .collect();
        matching.reverse();
        matching.truncate(limit);
        Ok(matching)
    }
}

// ---------------------------------------------------------------------------
// MockJobStore
// ---------------------------------------------------------------------------

/// Mock job store recording inserts; can fail the first N inserts.
#[derive(Clone)]
pub struct MockJobStore {
    pub inserted: Arc<Mutex<Vec<NewJob>>>,
    fail_next: Arc<Mutex<u32>>,
}

impl MockJobStore {
    pub fn empty() -> Self {
        Self {
            inserted: Arc::new(Mutex::new(Vec::new())),
            fail_next: Arc::new(Mutex::new(0)),
        }
    }

    /// Store whose next `n` inserts fail with a database error.
    pub fn failing_next(n: u32) -> Self {
        Self {
            inserted: Arc::new(Mutex::new(Vec::new())),
            fail_next: Arc::new(Mutex::new(n)),
        }
    }

    pub fn insert_count(&self) -> usize {
        self.inserted.lock().unwrap().len()
    }
}

impl JobStore for MockJobStore {
    async fn insert_job(&self, job: &NewJob) -> Result<Uuid, AppError> {
        let mut fail_next = self.fail_next.lock().unwrap();
        if *fail_next > 0 {
            *fail_next -= 1;
            return Err(AppError::DatabaseError("insert failed".into()));
        }
        self.inserted.lock().unwrap().push(job.clone());
        Ok(Uuid::new_v4())
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a dummy source for testing.
pub fn make_test_source(url: &str, config: Value) -> Source {
    Source {
        id: Uuid::new_v4(),
        name: "Test Board".to_string(),
        url: url.to_string(),
        scraper_type: SCRAPER_TYPE_APIFY_ACTOR.to_string(),
        config,
        enabled: true,
        last_run_at: None,
        last_status: SourceStatus::Idle,
        last_error: None,
        template_id: None,
        created_at: Utc::now(),
    }
}

/// Create a RawPosting with the given description and defaults elsewhere.
pub fn make_test_raw(description: &str) -> RawPosting {
    RawPosting {
        title: "SDR".to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        description: description.to_string(),
        apply_url: "https://example.com/jobs/1".to_string(),
        tags: Vec::new(),
        hourly_rate: None,
        salary_min: None,
        salary_max: None,
        payment_verified: false,
        rating: None,
        company_size: None,
    }
}

/// Create a classified hourly posting that passes every filter.
pub fn make_test_classified() -> ClassifiedPosting {
    let mut raw = make_test_raw("$25/hr, full-time");
    raw.payment_verified = true;
    ClassifiedPosting {
        raw,
        contract_type: ContractType::Hourly,
        hourly_rate: Some(25.0),
        ote_min: None,
        ote_max: None,
        payment_terms: Some(crate::posting::PaymentTerms::FixedHourly),
        is_payment_verified: true,
        rating: Some(4.5),
        project_type: Some(crate::posting::ProjectType::FullTime),
        company_size: None,
    }
}
