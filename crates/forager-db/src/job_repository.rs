use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use forager_core::error::AppError;
use forager_core::posting::{ContractType, Job, NewJob, PaymentTerms, ProjectType};

/// Filters for listing persisted jobs. Empty vectors and `None` mean
/// "no constraint on this dimension".
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    /// Exact location match against any of these values.
    pub locations: Vec<String>,
    /// Only jobs whose ote_min is at or above this floor.
    pub ote_min: Option<i64>,
    /// Only jobs whose ote_max is at or below this ceiling.
    pub ote_max: Option<i64>,
    /// Case-insensitive substring match against any stored tag.
    pub tags: Vec<String>,
    pub source_id: Option<Uuid>,
}

/// Repository for accepted postings. Insert-only: jobs are never mutated
/// after they land.
#[derive(Clone)]
pub struct JobRepository {
    pool: Pool<Postgres>,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_job(&self, job: &NewJob) -> Result<Uuid, AppError> {
        let row: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO jobs (
                title, company, company_size, ote_min, ote_max, location,
                tags, apply_url, source_id, source_name, scraped_at,
                contract_type, hourly_rate, payment_terms, is_payment_verified,
                rating, project_type, allowed_locations
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING id
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(job.company_size)
        .bind(job.ote_min)
        .bind(job.ote_max)
        .bind(&job.location)
        .bind(&job.tags)
        .bind(&job.apply_url)
        .bind(job.source_id)
        .bind(&job.source_name)
        .bind(job.scraped_at)
        .bind(job.contract_type.as_str())
        .bind(job.hourly_rate)
        .bind(job.payment_terms.map(|t| t.as_str()))
        .bind(job.is_payment_verified)
        .bind(job.rating)
        .bind(job.project_type.map(|t| t.as_str()))
        .bind(&job.allowed_locations)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.0)
    }

    /// List jobs matching the query, newest first.
    ///
    /// Location, OTE, and source filters run in SQL; tag matching is a
    /// case-insensitive substring test applied after the fetch.
    pub async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, AppError> {
        let locations: Option<&[String]> = if query.locations.is_empty() {
            None
        } else {
            Some(&query.locations)
        };

        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, title, company, company_size, ote_min, ote_max, location,
                   tags, apply_url, source_id, source_name, scraped_at,
                   contract_type, hourly_rate, payment_terms, is_payment_verified,
                   rating, project_type, allowed_locations, created_at
            FROM jobs
            WHERE ($1::TEXT[] IS NULL OR location = ANY($1))
              AND ($2::BIGINT IS NULL OR ote_min >= $2)
              AND ($3::BIGINT IS NULL OR ote_max <= $3)
              AND ($4::UUID IS NULL OR source_id = $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(locations)
        .bind(query.ote_min)
        .bind(query.ote_max)
        .bind(query.source_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut jobs: Vec<Job> = rows.into_iter().map(Into::into).collect();

        if !query.tags.is_empty() {
            let wanted: Vec<String> = query.tags.iter().map(|t| t.to_lowercase()).collect();
            jobs.retain(|job| {
                job.tags.iter().any(|tag| {
                    let tag = tag.to_lowercase();
                    wanted.iter().any(|w| tag.contains(w.as_str()))
                })
            });
        }

        Ok(jobs)
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    title: String,
    company: String,
    company_size: Option<i64>,
    ote_min: Option<i64>,
    ote_max: Option<i64>,
    location: String,
    tags: Vec<String>,
    apply_url: String,
    source_id: Uuid,
    source_name: String,
    scraped_at: DateTime<Utc>,
    contract_type: String,
    hourly_rate: Option<f64>,
    payment_terms: Option<String>,
    is_payment_verified: bool,
    rating: Option<f64>,
    project_type: Option<String>,
    allowed_locations: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: row.id,
            title: row.title,
            company: row.company,
            company_size: row.company_size,
            ote_min: row.ote_min,
            ote_max: row.ote_max,
            location: row.location,
            tags: row.tags,
            apply_url: row.apply_url,
            source_id: row.source_id,
            source_name: row.source_name,
            scraped_at: row.scraped_at,
            contract_type: row.contract_type.parse().unwrap_or(ContractType::Ote),
            hourly_rate: row.hourly_rate,
            payment_terms: row
                .payment_terms
                .and_then(|s| s.parse::<PaymentTerms>().ok()),
            is_payment_verified: row.is_payment_verified,
            rating: row.rating,
            project_type: row.project_type.and_then(|s| s.parse::<ProjectType>().ok()),
            allowed_locations: row.allowed_locations,
            created_at: row.created_at,
        }
    }
}

// -- Trait implementation --

impl forager_core::traits::JobStore for JobRepository {
    async fn insert_job(&self, job: &NewJob) -> Result<Uuid, AppError> {
        JobRepository::insert_job(self, job).await
    }
}
