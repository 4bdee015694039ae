pub mod apify;
pub mod browseruse;
pub mod config;
pub mod discover;

pub use apify::{ActorStats, ApifyClient, StoreActor};
pub use browseruse::BrowserUseClient;
pub use config::ProviderConfig;
pub use discover::{ActorRecommendation, discover_actors, generic_fallback_recommendation};
