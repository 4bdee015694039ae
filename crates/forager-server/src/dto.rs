use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use forager_client::ActorRecommendation;
use forager_core::posting::Job;
use forager_core::run::ScrapeRun;
use forager_core::source::{Source, SourceTemplate};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSourceRequest {
    pub name: String,
    /// Target URL. May be omitted when a template supplies it.
    pub url: Option<String>,
    pub scraper_type: Option<String>,
    pub config: Option<serde_json::Value>,
    pub template_id: Option<Uuid>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceResponse {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub scraper_type: String,
    pub config: serde_json::Value,
    pub enabled: bool,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_status: String,
    pub last_error: Option<String>,
    pub template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Source> for SourceResponse {
    fn from(source: Source) -> Self {
        Self {
            id: source.id,
            name: source.name,
            url: source.url,
            scraper_type: source.scraper_type,
            config: source.config,
            enabled: source.enabled,
            last_run_at: source.last_run_at,
            last_status: source.last_status.to_string(),
            last_error: source.last_error,
            template_id: source.template_id,
            created_at: source.created_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SourceListResponse {
    pub sources: Vec<SourceResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DeleteSourceResponse {
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunScraperRequest {
    pub source_id: Uuid,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunScraperResponse {
    pub success: bool,
    pub run_id: Uuid,
    pub jobs_found: u32,
    pub jobs_inserted: u32,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub id: Uuid,
    pub source_id: Uuid,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub jobs_found: u32,
    pub jobs_inserted: u32,
    pub error_message: Option<String>,
    pub log_entries: Vec<String>,
}

impl From<ScrapeRun> for RunResponse {
    fn from(run: ScrapeRun) -> Self {
        Self {
            id: run.id,
            source_id: run.source_id,
            status: run.status.to_string(),
            started_at: run.started_at,
            completed_at: run.completed_at,
            jobs_found: run.jobs_found,
            jobs_inserted: run.jobs_inserted,
            error_message: run.error_message,
            log_entries: run.log_entries,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RunListResponse {
    pub runs: Vec<RunResponse>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct JobsQuery {
    /// Comma-separated exact location matches.
    pub locations: Option<String>,
    /// Minimum accepted ote_min.
    pub ote_min: Option<i64>,
    /// Maximum accepted ote_max.
    pub ote_max: Option<i64>,
    /// Comma-separated tag substrings (case-insensitive).
    pub tags: Option<String>,
    pub source_id: Option<Uuid>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub company_size: Option<i64>,
    pub ote_min: Option<i64>,
    pub ote_max: Option<i64>,
    pub location: String,
    pub tags: Vec<String>,
    pub apply_url: String,
    pub source_id: Uuid,
    pub source_name: String,
    pub scraped_at: DateTime<Utc>,
    pub contract_type: String,
    pub hourly_rate: Option<f64>,
    pub payment_terms: Option<String>,
    pub is_payment_verified: bool,
    pub rating: Option<f64>,
    pub project_type: Option<String>,
    pub allowed_locations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            title: job.title,
            company: job.company,
            company_size: job.company_size,
            ote_min: job.ote_min,
            ote_max: job.ote_max,
            location: job.location,
            tags: job.tags,
            apply_url: job.apply_url,
            source_id: job.source_id,
            source_name: job.source_name,
            scraped_at: job.scraped_at,
            contract_type: job.contract_type.to_string(),
            hourly_rate: job.hourly_rate,
            payment_terms: job.payment_terms.map(|t| t.to_string()),
            is_payment_verified: job.is_payment_verified,
            rating: job.rating,
            project_type: job.project_type.map(|t| t.to_string()),
            allowed_locations: job.allowed_locations,
            created_at: job.created_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JobListResponse {
    pub jobs: Vec<JobResponse>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DiscoverRequest {
    /// Job board URL to find actors for.
    pub url: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub id: String,
    pub name: String,
    pub title: String,
    pub description: String,
    pub username: String,
    pub pricing: String,
    pub total_runs: u64,
    pub avg_run_time: String,
    pub score: u32,
}

impl From<ActorRecommendation> for RecommendationResponse {
    fn from(rec: ActorRecommendation) -> Self {
        Self {
            id: rec.id,
            name: rec.name,
            title: rec.title,
            description: rec.description,
            username: rec.username,
            pricing: rec.pricing,
            total_runs: rec.stats.total_runs,
            avg_run_time: rec.stats.avg_run_time,
            score: rec.score,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverResponse {
    pub recommendations: Vec<RecommendationResponse>,
    /// Set when no board-specific actor was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Generic actor suggested when the search came up empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<RecommendationResponse>,
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub scraper_type: String,
    pub config: serde_json::Value,
    pub is_default: bool,
    pub description: Option<String>,
}

impl From<SourceTemplate> for TemplateResponse {
    fn from(template: SourceTemplate) -> Self {
        Self {
            id: template.id,
            name: template.name,
            url: template.url,
            scraper_type: template.scraper_type,
            config: template.config,
            is_default: template.is_default,
            description: template.description,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateResponse>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
