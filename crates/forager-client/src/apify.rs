use std::time::Duration;

use forager_core::error::AppError;
use forager_core::provider::ActorProvider;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";

/// Hard bound on a synchronous actor run; exceeding it is treated as a
/// provider failure and triggers the fallback path.
const ACTOR_RUN_TIMEOUT: Duration = Duration::from_secs(300);

/// Apify API client: runs actors synchronously and searches the actor store.
#[derive(Clone)]
pub struct ApifyClient {
    client: Client,
    base_url: String,
    token: String,
    timeout_secs: u64,
}

impl ApifyClient {
    pub fn new(token: &str) -> Result<Self, AppError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(ACTOR_RUN_TIMEOUT)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            timeout_secs: ACTOR_RUN_TIMEOUT.as_secs(),
        })
    }

    /// Search the actor store, returning up to 10 raw actor entries.
    pub async fn search_store(&self, query: &str) -> Result<Vec<StoreActor>, AppError> {
        let url = format!("{}/store", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("search", query), ("limit", "10")])
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderError {
                message,
                status_code: status.as_u16(),
            });
        }

        let body: StoreResponse = response
            .json()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to parse store response: {e}")))?;

        Ok(body.data.map(|d| d.items).unwrap_or_default())
    }

    fn map_request_error(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            AppError::NetworkError(format!("Connection failed: {e}"))
        } else {
            AppError::HttpError(e.to_string())
        }
    }
}

impl ActorProvider for ApifyClient {
    /// Run an actor synchronously and return its dataset items.
    async fn run_actor(&self, actor_id: &str, input: &Value) -> Result<Vec<Value>, AppError> {
        let url = format!(
            "{}/acts/{}/run-sync-get-dataset-items",
            self.base_url, actor_id
        );

        tracing::info!(actor_id, "Starting synchronous actor run");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderError {
                message,
                status_code: status.as_u16(),
            });
        }

        let items: Vec<Value> = response
            .json()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to parse dataset items: {e}")))?;

        tracing::info!(actor_id, count = items.len(), "Actor run completed");
        Ok(items)
    }
}

// ---- Store API types ----

#[derive(Deserialize)]
struct StoreResponse {
    data: Option<StoreData>,
}

#[derive(Deserialize)]
struct StoreData {
    #[serde(default)]
    items: Vec<StoreActor>,
}

/// One actor entry from the store search API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreActor {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub username: String,
    #[serde(default)]
    pub stats: Option<ActorStats>,
    #[serde(default)]
    pub user_pricing_model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorStats {
    #[serde(default)]
    pub total_runs: u64,
}
