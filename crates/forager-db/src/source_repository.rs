use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use forager_core::error::AppError;
use forager_core::source::{CreateSourceRequest, Source, SourceStatus};

/// Repository for source persistence in PostgreSQL.
#[derive(Clone)]
pub struct SourceRepository {
    pool: Pool<Postgres>,
}

impl SourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All sources, newest first.
    pub async fn list_sources(&self) -> Result<Vec<Source>, AppError> {
        let rows = sqlx::query_as::<_, SourceRow>(
            r#"
            SELECT id, name, url, scraper_type, config, enabled,
                   last_run_at, last_status, last_error, template_id, created_at
            FROM sources
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create_source(&self, request: &CreateSourceRequest) -> Result<Source, AppError> {
        let row = sqlx::query_as::<_, SourceRow>(
            r#"
            INSERT INTO sources (name, url, scraper_type, config, template_id, enabled)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING id, name, url, scraper_type, config, enabled,
                      last_run_at, last_status, last_error, template_id, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.url)
        .bind(&request.scraper_type)
        .bind(&request.config)
        .bind(request.template_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.into())
    }

    pub async fn get_source(&self, id: Uuid) -> Result<Option<Source>, AppError> {
        let row = sqlx::query_as::<_, SourceRow>(
            r#"
            SELECT id, name, url, scraper_type, config, enabled,
                   last_run_at, last_status, last_error, template_id, created_at
            FROM sources
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    /// Delete a source. Returns false if no row matched.
    pub async fn delete_source(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM sources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: SourceStatus,
        error: Option<&str>,
        stamp_run: bool,
    ) -> Result<(), AppError> {
        let query = if stamp_run {
            r#"
            UPDATE sources
            SET last_status = $2, last_error = $3, last_run_at = NOW()
            WHERE id = $1
            "#
        } else {
            r#"
            UPDATE sources
            SET last_status = $2, last_error = $3
            WHERE id = $1
            "#
        };

        sqlx::query(query)
            .bind(id)
            .bind(status.as_str())
            .bind(error)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct SourceRow {
    id: Uuid,
    name: String,
    url: String,
    scraper_type: String,
    config: serde_json::Value,
    enabled: bool,
    last_run_at: Option<DateTime<Utc>>,
    last_status: String,
    last_error: Option<String>,
    template_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<SourceRow> for Source {
    fn from(row: SourceRow) -> Self {
        Source {
            id: row.id,
            name: row.name,
            url: row.url,
            scraper_type: row.scraper_type,
            config: row.config,
            enabled: row.enabled,
            last_run_at: row.last_run_at,
            last_status: row.last_status.parse().unwrap_or(SourceStatus::Idle),
            last_error: row.last_error,
            template_id: row.template_id,
            created_at: row.created_at,
        }
    }
}

// -- Trait implementation --

impl forager_core::traits::SourceStore for SourceRepository {
    async fn get_source(&self, id: Uuid) -> Result<Option<Source>, AppError> {
        SourceRepository::get_source(self, id).await
    }

    async fn mark_running(&self, id: Uuid) -> Result<(), AppError> {
        self.set_status(id, SourceStatus::Running, None, true).await
    }

    async fn mark_succeeded(&self, id: Uuid) -> Result<(), AppError> {
        self.set_status(id, SourceStatus::Success, None, false).await
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), AppError> {
        self.set_status(id, SourceStatus::Error, Some(error), false)
            .await
    }
}
