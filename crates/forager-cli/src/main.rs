use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use forager_client::ProviderConfig;
use forager_core::provider::ProviderChain;
use forager_core::{RunLocks, ScrapeOrchestrator};
use forager_db::{Database, DatabaseConfig, JobQuery};

#[derive(Parser)]
#[command(name = "forager", version, about = "Job posting ingestion pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured sources with their last run status
    Sources,

    /// Run the full scrape pipeline for one source
    Run {
        /// Source ID to scrape
        #[arg(short, long)]
        source_id: Uuid,
    },

    /// Show recent runs and their log entries for a source
    Runs {
        /// Source ID
        #[arg(short, long)]
        source_id: Uuid,

        /// Number of runs to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Export accepted jobs to a CSV file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Comma-separated exact location matches
        #[arg(long)]
        locations: Option<String>,

        /// Minimum accepted OTE floor
        #[arg(long)]
        ote_min: Option<i64>,

        /// Maximum accepted OTE ceiling
        #[arg(long)]
        ote_max: Option<i64>,

        /// Comma-separated tag substrings
        #[arg(long)]
        tags: Option<String>,

        /// Only jobs from this source
        #[arg(long)]
        source_id: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("forager=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sources => {
            let db = connect_db().await?;
            cmd_sources(&db).await?;
        }
        Commands::Run { source_id } => {
            let db = connect_db().await?;
            cmd_run(&db, source_id).await?;
        }
        Commands::Runs { source_id, limit } => {
            let db = connect_db().await?;
            cmd_runs(&db, source_id, limit).await?;
        }
        Commands::Export {
            output,
            locations,
            ote_min,
            ote_max,
            tags,
            source_id,
        } => {
            let db = connect_db().await?;
            let query = JobQuery {
                locations: split_csv(locations.as_deref()),
                ote_min,
                ote_max,
                tags: split_csv(tags.as_deref()),
                source_id,
            };
            cmd_export(&db, &query, &output).await?;
        }
    }

    Ok(())
}

/// Connect to PostgreSQL using DATABASE_URL and run pending migrations.
async fn connect_db() -> Result<Database> {
    let config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let db = Database::connect(&config)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(db)
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

async fn cmd_sources(db: &Database) -> Result<()> {
    let sources = db
        .source_repo()
        .list_sources()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    if sources.is_empty() {
        println!("No sources configured");
        return Ok(());
    }

    for source in &sources {
        let last_run = source
            .last_run_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  [{}] {} — {} (last run: {}, status: {})",
            source.id, source.name, source.url, last_run, source.last_status,
        );
        if let Some(error) = &source.last_error {
            println!("      last error: {error}");
        }
    }

    println!("\nTotal: {} sources", sources.len());
    Ok(())
}

async fn cmd_run(db: &Database, source_id: Uuid) -> Result<()> {
    let providers = ProviderConfig::from_env();
    let chain = ProviderChain::new(
        providers.apify_client().map_err(|e| anyhow::anyhow!(e))?,
        providers
            .browseruse_client()
            .map_err(|e| anyhow::anyhow!(e))?,
    );

    let orchestrator = ScrapeOrchestrator::new(
        chain,
        db.source_repo(),
        db.run_repo(),
        db.job_repo(),
        RunLocks::default(),
    );

    tracing::info!(%source_id, "Starting scrape run");
    let outcome = orchestrator
        .run_source(source_id)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    println!(
        "Run {} complete: {} jobs found, {} inserted after filtering",
        outcome.run_id, outcome.jobs_found, outcome.jobs_inserted,
    );
    Ok(())
}

async fn cmd_runs(db: &Database, source_id: Uuid, limit: usize) -> Result<()> {
    let runs = db
        .run_repo()
        .recent_runs(source_id, limit)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    if runs.is_empty() {
        println!("No runs found for source {source_id}");
        return Ok(());
    }

    for run in &runs {
        println!(
            "  [{}] {} — {} ({} found, {} inserted)",
            run.status,
            run.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            run.id,
            run.jobs_found,
            run.jobs_inserted,
        );
        for entry in &run.log_entries {
            println!("      {entry}");
        }
        if let Some(error) = &run.error_message {
            println!("      error: {error}");
        }
    }

    println!("\nTotal: {} runs", runs.len());
    Ok(())
}

async fn cmd_export(db: &Database, query: &JobQuery, output: &PathBuf) -> Result<()> {
    let jobs = db
        .job_repo()
        .list_jobs(query)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    write_jobs_csv(file, &jobs)?;

    println!("Exported {} jobs to {}", jobs.len(), output.display());
    Ok(())
}

fn write_jobs_csv<W: std::io::Write>(out: W, jobs: &[forager_core::Job]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record([
        "Title",
        "Company",
        "Company Size",
        "OTE Min",
        "OTE Max",
        "Location",
        "Tags",
        "Apply URL",
        "Source",
    ])?;

    for job in jobs {
        writer.write_record([
            job.title.as_str(),
            job.company.as_str(),
            &job.company_size.map(|v| v.to_string()).unwrap_or_default(),
            &job.ote_min.map(|v| v.to_string()).unwrap_or_default(),
            &job.ote_max.map(|v| v.to_string()).unwrap_or_default(),
            job.location.as_str(),
            &job.tags.join("; "),
            job.apply_url.as_str(),
            job.source_name.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
