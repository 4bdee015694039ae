use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

/// SQL migration statements, executed one at a time.
const MIGRATIONS: &[&str] = &[
    // 001_init.sql
    r#"CREATE TABLE IF NOT EXISTS sources (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR NOT NULL,
        url VARCHAR NOT NULL,
        scraper_type VARCHAR(50) NOT NULL DEFAULT 'apify_actor',
        config JSONB NOT NULL DEFAULT '{}',
        enabled BOOLEAN NOT NULL DEFAULT TRUE,
        last_run_at TIMESTAMPTZ,
        last_status VARCHAR(20) NOT NULL DEFAULT 'idle',
        last_error TEXT,
        template_id UUID,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT chk_sources_last_status CHECK (
            last_status IN ('idle', 'running', 'success', 'error')
        )
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_sources_created ON sources(created_at DESC)"#,
    r#"CREATE TABLE IF NOT EXISTS scrape_runs (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        source_id UUID NOT NULL REFERENCES sources(id) ON DELETE CASCADE,
        status VARCHAR(20) NOT NULL DEFAULT 'running',
        started_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        completed_at TIMESTAMPTZ,
        jobs_found INTEGER NOT NULL DEFAULT 0,
        jobs_inserted INTEGER NOT NULL DEFAULT 0,
        error_message TEXT,
        log_entries TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT chk_scrape_runs_status CHECK (
            status IN ('running', 'success', 'error')
        )
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_scrape_runs_source
        ON scrape_runs(source_id, started_at DESC)"#,
    r#"CREATE TABLE IF NOT EXISTS jobs (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        title VARCHAR NOT NULL,
        company VARCHAR NOT NULL,
        company_size BIGINT,
        ote_min BIGINT,
        ote_max BIGINT,
        location VARCHAR NOT NULL,
        tags TEXT[] NOT NULL DEFAULT '{}',
        apply_url VARCHAR NOT NULL,
        source_id UUID NOT NULL REFERENCES sources(id) ON DELETE CASCADE,
        source_name VARCHAR NOT NULL,
        scraped_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        contract_type VARCHAR(20) NOT NULL,
        hourly_rate DOUBLE PRECISION,
        payment_terms VARCHAR(50),
        is_payment_verified BOOLEAN NOT NULL DEFAULT FALSE,
        rating DOUBLE PRECISION,
        project_type VARCHAR(50),
        allowed_locations TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT chk_jobs_contract_type CHECK (contract_type IN ('hourly', 'ote'))
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_jobs_created ON jobs(created_at DESC)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_jobs_source ON jobs(source_id, created_at DESC)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_jobs_location ON jobs(location)"#,
    r#"CREATE TABLE IF NOT EXISTS source_templates (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR NOT NULL,
        url VARCHAR NOT NULL,
        scraper_type VARCHAR(50) NOT NULL DEFAULT 'apify_actor',
        config JSONB NOT NULL DEFAULT '{}',
        is_default BOOLEAN NOT NULL DEFAULT FALSE,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
];

/// Spins up a PostgreSQL container and returns a connected pool.
///
/// The `ContainerAsync` must be kept in scope for the test duration —
/// dropping it will stop the container.
pub async fn setup_test_db() -> (PgPool, ContainerAsync<GenericImage>) {
    let container = GenericImage::new("postgres", "16")
        .with_exposed_port(ContainerPort::Tcp(5432))
        .with_wait_for(WaitFor::message_on_stderr(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_PASSWORD", "postgres")
        .with_env_var("POSTGRES_DB", "forager_test")
        .start()
        .await
        .expect("Failed to start PostgreSQL container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get port");

    let connection_string = format!("postgresql://postgres:postgres@{host}:{port}/forager_test");

    // Retry connection until container is fully ready
    const MAX_RETRIES: u32 = 30;
    let mut retries = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .connect(&connection_string)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retries += 1;
                if retries >= MAX_RETRIES {
                    panic!("Failed to connect to database after {MAX_RETRIES} retries: {e}");
                }
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            }
        }
    };

    // Run migrations one statement at a time
    for migration in MIGRATIONS {
        sqlx::query(migration)
            .execute(&pool)
            .await
            .expect("Failed to run migration");
    }

    (pool, container)
}

/// Insert a source directly and return it. Most tests need one because
/// runs and jobs both reference sources.
pub async fn seed_source(pool: &PgPool, name: &str, url: &str) -> forager_core::Source {
    let repo = forager_db::SourceRepository::new(pool.clone());
    let req = forager_core::CreateSourceRequest::new(name, url)
        .with_config(serde_json::json!({"actorId": "acme/job-scraper"}));
    repo.create_source(&req).await.expect("Failed to seed source")
}
