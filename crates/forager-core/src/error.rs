use thiserror::Error;
use uuid::Uuid;

/// Application-wide error types for Forager.
#[derive(Error, Debug)]
pub enum AppError {
    /// Required configuration (provider token, connection string) is missing.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// The requested source does not exist.
    #[error("Source not found: {0}")]
    SourceNotFound(Uuid),

    /// Another run for the same source is already in flight.
    #[error("A scrape run is already in progress for source {0}")]
    RunInProgress(Uuid),

    /// Provider API call failed with a non-2xx response.
    #[error("Provider error (HTTP {status_code}): {message}")]
    ProviderError { message: String, status_code: u16 },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if this error is a failed provider fetch, the class of
    /// failure the fallback provider may recover from. Missing configuration
    /// is not recoverable: no fallback is attempted for it.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            AppError::ProviderError { .. }
                | AppError::HttpError(_)
                | AppError::Timeout(_)
                | AppError::NetworkError(_)
        )
    }
}
