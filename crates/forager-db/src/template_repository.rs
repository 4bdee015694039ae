use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use forager_core::error::AppError;
use forager_core::source::SourceTemplate;

/// Read-only access to the catalog of known job boards.
#[derive(Clone)]
pub struct TemplateRepository {
    pool: Pool<Postgres>,
}

impl TemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All templates, defaults first, then alphabetical.
    pub async fn list_templates(&self) -> Result<Vec<SourceTemplate>, AppError> {
        let rows = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT id, name, url, scraper_type, config, is_default, description, created_at
            FROM source_templates
            ORDER BY is_default DESC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_template(&self, id: Uuid) -> Result<Option<SourceTemplate>, AppError> {
        let row = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT id, name, url, scraper_type, config, is_default, description, created_at
            FROM source_templates
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: Uuid,
    name: String,
    url: String,
    scraper_type: String,
    config: serde_json::Value,
    is_default: bool,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<TemplateRow> for SourceTemplate {
    fn from(row: TemplateRow) -> Self {
        SourceTemplate {
            id: row.id,
            name: row.name,
            url: row.url,
            scraper_type: row.scraper_type,
            config: row.config,
            is_default: row.is_default,
            description: row.description,
            created_at: row.created_at,
        }
    }
}
