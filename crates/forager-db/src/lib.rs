pub mod config;
pub mod database;
pub mod job_repository;
pub mod run_repository;
pub mod source_repository;
pub mod template_repository;

pub use config::DatabaseConfig;
pub use database::Database;
pub use job_repository::{JobQuery, JobRepository};
pub use run_repository::RunRepository;
pub use source_repository::SourceRepository;
pub use template_repository::TemplateRepository;
