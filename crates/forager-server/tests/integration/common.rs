use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

use forager_client::ProviderConfig;
use forager_core::RunLocks;
use forager_db::Database;
use forager_server::routes;
use forager_server::state::AppState;

const MIGRATIONS: &[&str] = &[
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

/// Spin up a PostgreSQL container and return the test app router + container handle.
///
/// Provider credentials are left unconfigured: run-scraper tests exercise
/// the config-error path, everything else never reaches a provider.
pub async fn setup_test_app() -> (Router, ContainerAsync<GenericImage>) {
    let (router, _, container) = setup_test_app_with_pool().await;
    (router, container)
}

/// Variant that also hands back the pool, for tests that seed rows directly.
pub async fn setup_test_app_with_pool() -> (Router, PgPool, ContainerAsync<GenericImage>) {
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

    let url = format!("postgresql://postgres:postgres@{host}:{port}/forager_test");

    let pool = retry_connect(&url).await;

    for migration in MIGRATIONS {
        sqlx::query(migration)
            .execute(&pool)
            .await
            .expect("Failed to run migration");
    }

    let db = Database::from_pool(pool.clone());
    let state = Arc::new(AppState {
        db,
        providers: ProviderConfig::disabled(),
        locks: RunLocks::default(),
    });

    (routes::router(state), pool, container)
}

async fn retry_connect(url: &str) -> PgPool {
    for _ in 0..30 {
        if let Ok(pool) = PgPoolOptions::new().max_connections(5).connect(url).await {
            return pool;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
    panic!("Failed to connect to test database");
}
