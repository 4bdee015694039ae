use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use forager_core::error::AppError;
use forager_core::run::{RunStatus, ScrapeRun};

/// Repository for scrape runs and their diagnostic logs.
///
/// Log appends use `array_append` inside a single UPDATE, so concurrent
/// appends to the same run serialize at the database and never lose
/// entries to a read-modify-write race.
#[derive(Clone)]
pub struct RunRepository {
    pool: Pool<Postgres>,
}

impl RunRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_run(&self, source_id: Uuid, first_entry: &str) -> Result<Uuid, AppError> {
        let row: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO scrape_runs (source_id, status, started_at, log_entries)
            VALUES ($1, 'running', NOW(), ARRAY[$2])
            RETURNING id
            "#,
        )
        .bind(source_id)
        .bind(first_entry)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.0)
    }

    pub async fn append_log(&self, run_id: Uuid, entry: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE scrape_runs
            SET log_entries = array_append(log_entries, $2)
            WHERE id = $1
            "#,
        )
        .bind(run_id)
        .bind(entry)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    pub async fn finalize_run(
        &self,
        run_id: Uuid,
        status: RunStatus,
        jobs_found: u32,
        jobs_inserted: u32,
        error_message: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE scrape_runs
            SET status = $2, completed_at = NOW(),
                jobs_found = $3, jobs_inserted = $4, error_message = $5
            WHERE id = $1
            "#,
        )
        .bind(run_id)
        .bind(status.as_str())
        .bind(jobs_found as i32)
        .bind(jobs_inserted as i32)
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    pub async fn get_run(&self, run_id: Uuid) -> Result<Option<ScrapeRun>, AppError> {
        let row = sqlx::query_as::<_, ScrapeRunRow>(
            r#"
            SELECT id, source_id, status, started_at, completed_at,
                   jobs_found, jobs_inserted, error_message, log_entries, created_at
            FROM scrape_runs
            WHERE id = $1
            "#,
        )
        .bind(run_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    /// Most recent runs for a source, newest first.
    pub async fn recent_runs(
        &self,
        source_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ScrapeRun>, AppError> {
        let rows = sqlx::query_as::<_, ScrapeRunRow>(
            r#"
            SELECT id, source_id, status, started_at, completed_at,
                   jobs_found, jobs_inserted, error_message, log_entries, created_at
            FROM scrape_runs
            WHERE source_id = $1
            ORDER BY started_at DESC
            LIMIT $2
            "#,
        )
        .bind(source_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct ScrapeRunRow {
    id: Uuid,
    source_id: Uuid,
    status: String,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    jobs_found: i32,
    jobs_inserted: i32,
    error_message: Option<String>,
    log_entries: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<ScrapeRunRow> for ScrapeRun {
    fn from(row: ScrapeRunRow) -> Self {
        ScrapeRun {
            id: row.id,
            source_id: row.source_id,
            status: row.status.parse().unwrap_or(RunStatus::Running),
            started_at: row.started_at,
            completed_at: row.completed_at,
            jobs_found: row.jobs_found.max(0) as u32,
            jobs_inserted: row.jobs_inserted.max(0) as u32,
            error_message: row.error_message,
            log_entries: row.log_entries,
            created_at: row.created_at,
        }
    }
}

// -- Trait implementation --

impl forager_core::traits::RunStore for RunRepository {
    async fn create_run(&self, source_id: Uuid, first_entry: &str) -> Result<Uuid, AppError> {
        RunRepository::create_run(self, source_id, first_entry).await
    }

    async fn append_log(&self, run_id: Uuid, entry: &str) -> Result<(), AppError> {
        RunRepository::append_log(self, run_id, entry).await
    }

    async fn finalize_run(
        &self,
        run_id: Uuid,
        status: RunStatus,
        jobs_found: u32,
        jobs_inserted: u32,
        error_message: Option<&str>,
    ) -> Result<(), AppError> {
        RunRepository::finalize_run(self, run_id, status, jobs_found, jobs_inserted, error_message)
            .await
    }

    async fn recent_runs(&self, source_id: Uuid, limit: usize) -> Result<Vec<ScrapeRun>, AppError> {
        RunRepository::recent_runs(self, source_id, limit).await
    }
}
