pub mod classify;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod posting;
pub mod provider;
pub mod run;
pub mod run_lock;
pub mod scrape;
pub mod source;
pub mod testutil;
pub mod traits;

pub use error::AppError;
pub use filter::ALLOWED_LOCATIONS;
pub use posting::{ClassifiedPosting, ContractType, Job, NewJob, PaymentTerms, ProjectType, RawPosting};
pub use provider::{ActorProvider, FallbackProvider, FetchPath, FetchReport, ProviderChain};
pub use run::{RunOutcome, RunStatus, ScrapeRun};
pub use run_lock::RunLocks;
pub use scrape::ScrapeOrchestrator;
pub use source::{CreateSourceRequest, SCRAPER_TYPE_APIFY_ACTOR, Source, SourceStatus, SourceTemplate};
pub use traits::{JobStore, RunLogger, RunStore, SourceStore};
