use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use forager_client::{discover_actors, generic_fallback_recommendation};
use forager_core::ScrapeOrchestrator;
use forager_core::provider::ProviderChain;
use forager_core::source::CreateSourceRequest as NewSourceRequest;
use forager_db::JobQuery;

use crate::dto::{
    CreateSourceRequest, DeleteSourceResponse, DiscoverRequest, DiscoverResponse, HealthResponse,
    JobListResponse, JobResponse, JobsQuery, RecommendationResponse, RunListResponse, RunResponse,
    RunScraperRequest, RunScraperResponse, SourceListResponse, SourceResponse,
    TemplateListResponse, TemplateResponse,
};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sources", get(list_sources))
        .route("/sources", post(create_source))
        .route("/sources", delete(delete_source_without_id))
        .route("/sources/{id}", delete(delete_source))
        .route("/sources/{id}/runs", get(list_source_runs))
        .route("/run-scraper", post(run_scraper))
        .route("/jobs", get(list_jobs))
        .route("/discover-scraper", post(discover_scraper))
        .route("/templates", get(list_templates))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/sources",
    responses(
        (status = 200, description = "All configured sources", body = SourceListResponse),
    ),
    tag = "sources"
)]
pub async fn list_sources(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let sources = state.db.source_repo().list_sources().await?;
    let total = sources.len();

    let response = SourceListResponse {
        sources: sources.into_iter().map(SourceResponse::from).collect(),
        total,
    };

    Ok(axum::Json(response))
}

#[utoipa::path(
    post,
    path = "/sources",
    request_body = CreateSourceRequest,
    responses(
        (status = 201, description = "Source created", body = SourceResponse),
        (status = 400, description = "Bad request", body = crate::dto::ErrorResponse),
    ),
    tag = "sources"
)]
pub async fn create_source(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<CreateSourceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // A template supplies url, scraper type, and config for any the
    // request leaves out.
    let template = match body.template_id {
        Some(id) => state.db.template_repo().get_template(id).await?,
        None => None,
    };

    let url = body
        .url
        .or_else(|| template.as_ref().map(|t| t.url.clone()));
    let Some(url) = url else {
        let body = crate::dto::ErrorResponse {
            error: "bad_request".to_string(),
            message: "Source URL is required".to_string(),
        };
        return Ok((StatusCode::BAD_REQUEST, axum::Json(body)).into_response());
    };

    let mut request = NewSourceRequest::new(body.name, url);
    if let Some(scraper_type) = body
        .scraper_type
        .or_else(|| template.as_ref().map(|t| t.scraper_type.clone()))
    {
        request = request.with_scraper_type(scraper_type);
    }
    if let Some(config) = body
        .config
        .or_else(|| template.as_ref().map(|t| t.config.clone()))
    {
        request = request.with_config(config);
    }
    if let Some(template) = &template {
        request = request.with_template(template.id);
    }

    let source = state.db.source_repo().create_source(&request).await?;

    Ok((StatusCode::CREATED, axum::Json(SourceResponse::from(source))).into_response())
}

#[utoipa::path(
    delete,
    path = "/sources",
    responses(
        (status = 400, description = "Source ID required", body = crate::dto::ErrorResponse),
    ),
    tag = "sources"
)]
pub async fn delete_source_without_id() -> impl IntoResponse {
    let body = crate::dto::ErrorResponse {
        error: "bad_request".to_string(),
        message: "Source ID required".to_string(),
    };
    (StatusCode::BAD_REQUEST, axum::Json(body))
}

#[utoipa::path(
    delete,
    path = "/sources/{id}",
    params(
        ("id" = Uuid, Path, description = "Source ID")
    ),
    responses(
        (status = 200, description = "Source deleted", body = DeleteSourceResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
    ),
    tag = "sources"
)]
pub async fn delete_source(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.db.source_repo().delete_source(id).await?;

    if deleted {
        Ok(axum::Json(DeleteSourceResponse { success: true }).into_response())
    } else {
        let body = crate::dto::ErrorResponse {
            error: "not_found".to_string(),
            message: format!("Source not found: {id}"),
        };
        Ok((StatusCode::NOT_FOUND, axum::Json(body)).into_response())
    }
}

#[utoipa::path(
    get,
    path = "/sources/{id}/runs",
    params(
        ("id" = Uuid, Path, description = "Source ID")
    ),
    responses(
        (status = 200, description = "Recent runs with log entries", body = RunListResponse),
    ),
    tag = "runs"
)]
pub async fn list_source_runs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let runs = state.db.run_repo().recent_runs(id, 10).await?;
    let total = runs.len();

    let response = RunListResponse {
        runs: runs.into_iter().map(RunResponse::from).collect(),
        total,
    };

    Ok(axum::Json(response))
}

// ---------------------------------------------------------------------------
// Scraping
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/run-scraper",
    request_body = RunScraperRequest,
    responses(
        (status = 200, description = "Run completed", body = RunScraperResponse),
        (status = 404, description = "Unknown source", body = crate::dto::ErrorResponse),
        (status = 409, description = "Run already in progress", body = crate::dto::ErrorResponse),
        (status = 500, description = "Run failed", body = crate::dto::ErrorResponse),
    ),
    tag = "scraping"
)]
pub async fn run_scraper(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<RunScraperRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = ProviderChain::new(
        state.providers.apify_client()?,
        state.providers.browseruse_client()?,
    );
    let orchestrator = ScrapeOrchestrator::new(
        chain,
        state.db.source_repo(),
        state.db.run_repo(),
        state.db.job_repo(),
        state.locks.clone(),
    );

    let outcome = orchestrator.run_source(body.source_id).await?;

    let response = RunScraperResponse {
        success: true,
        run_id: outcome.run_id,
        jobs_found: outcome.jobs_found,
        jobs_inserted: outcome.jobs_inserted,
    };

    Ok(axum::Json(response))
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/jobs",
    params(JobsQuery),
    responses(
        (status = 200, description = "Matching jobs, newest first", body = JobListResponse),
    ),
    tag = "jobs"
)]
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<JobsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = JobQuery {
        locations: split_csv(query.locations.as_deref()),
        ote_min: query.ote_min,
        ote_max: query.ote_max,
        tags: split_csv(query.tags.as_deref()),
        source_id: query.source_id,
    };

    let jobs = state.db.job_repo().list_jobs(&filter).await?;
    let total = jobs.len();

    let response = JobListResponse {
        jobs: jobs.into_iter().map(JobResponse::from).collect(),
        total,
    };

    Ok(axum::Json(response))
}

fn split_csv(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/discover-scraper",
    request_body = DiscoverRequest,
    responses(
        (status = 200, description = "Actor recommendations", body = DiscoverResponse),
        (status = 500, description = "Provider not configured", body = crate::dto::ErrorResponse),
    ),
    tag = "discovery"
)]
pub async fn discover_scraper(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<DiscoverRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let client = state.providers.apify_client()?.ok_or_else(|| {
        forager_core::AppError::ConfigError(
            "Provider API token required for actor discovery".to_string(),
        )
    })?;

    let recommendations = discover_actors(&client, &body.url).await?;

    let response = if recommendations.is_empty() {
        DiscoverResponse {
            recommendations: Vec::new(),
            message: Some("No job-related actors found for this board".to_string()),
            fallback: Some(RecommendationResponse::from(
                generic_fallback_recommendation(),
            )),
        }
    } else {
        DiscoverResponse {
            recommendations: recommendations
                .into_iter()
                .map(RecommendationResponse::from)
                .collect(),
            message: None,
            fallback: None,
        }
    };

    Ok(axum::Json(response))
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/templates",
    responses(
        (status = 200, description = "Source template catalog", body = TemplateListResponse),
    ),
    tag = "templates"
)]
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let templates = state.db.template_repo().list_templates().await?;
    let total = templates.len();

    let response = TemplateListResponse {
        templates: templates.into_iter().map(TemplateResponse::from).collect(),
        total,
    };

    Ok(axum::Json(response))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_status = match state.db.health_check().await {
        Ok(()) => "ok",
        Err(_) => "error",
    };

    let status = if db_status == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if db_status == "ok" {
            "healthy"
        } else {
            "unhealthy"
        },
        database: db_status,
    };

    (status, axum::Json(response))
}
