use forager_client::ProviderConfig;
use forager_core::RunLocks;
use forager_db::Database;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub db: Database,
    /// Provider credentials, read once at startup.
    pub providers: ProviderConfig,
    /// In-process per-source run locks.
    pub locks: RunLocks,
}
