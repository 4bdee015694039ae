use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Forager API",
        version = "0.1.0",
        description = "Job posting ingestion: provider-backed scraping, rule-based filtering, and run auditing."
    ),
    paths(
        crate::routes::list_sources,
        crate::routes::create_source,
        crate::routes::delete_source_without_id,
        crate::routes::delete_source,
        crate::routes::list_source_runs,
        crate::routes::run_scraper,
        crate::routes::list_jobs,
        crate::routes::discover_scraper,
        crate::routes::list_templates,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::CreateSourceRequest,
        crate::dto::SourceResponse,
        crate::dto::SourceListResponse,
        crate::dto::DeleteSourceResponse,
        crate::dto::RunScraperRequest,
        crate::dto::RunScraperResponse,
        crate::dto::RunResponse,
        crate::dto::RunListResponse,
        crate::dto::JobResponse,
        crate::dto::JobListResponse,
        crate::dto::DiscoverRequest,
        crate::dto::DiscoverResponse,
        crate::dto::RecommendationResponse,
        crate::dto::TemplateResponse,
        crate::dto::TemplateListResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "sources", description = "Scrape target management"),
        (name = "scraping", description = "Pipeline runs"),
        (name = "runs", description = "Run history and logs"),
        (name = "jobs", description = "Accepted postings"),
        (name = "discovery", description = "Actor discovery"),
        (name = "templates", description = "Source template catalog"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
