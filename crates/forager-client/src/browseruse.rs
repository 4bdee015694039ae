use std::time::Duration;

use forager_core::error::AppError;
use forager_core::provider::FallbackProvider;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

const DEFAULT_BASE_URL: &str = "https://api.browseruse.ai";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// BrowserUse fallback client: keyword/selector-based generic extraction
/// against a rendered page. Best-effort only; callers swallow its failures.
#[derive(Clone)]
pub struct BrowserUseClient {
    client: Client,
    base_url: String,
    secret: String,
    timeout_secs: u64,
}

impl BrowserUseClient {
    pub fn new(secret: &str) -> Result<Self, AppError> {
        Self::with_base_url(secret, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(secret: &str, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret: secret.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        })
    }
}

/// Generic job-listing extraction payload: broad selectors that match most
/// board layouts, with per-field selector guesses.
fn extraction_payload(url: &str) -> Value {
    json!({
        "url": url,
        "extract": {
            "jobs": {
                "selector": "article, .job-listing, .job-item, [class*=\"job\"]",
                "fields": {
                    "title": "h1, h2, h3, .title, [class*=\"title\"]",
                    "company": ".company, [class*=\"company\"]",
                    "location": ".location, [class*=\"location\"]",
                    "description": ".description, [class*=\"description\"]",
                    "url": "a[href]@href"
                }
            }
        }
    })
}

#[derive(Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    jobs: Vec<Value>,
}

impl FallbackProvider for BrowserUseClient {
    async fn extract(&self, url: &str) -> Result<Vec<Value>, AppError> {
        let endpoint = format!("{}/v1/scrape", self.base_url);

        tracing::info!(url, "Starting fallback extraction");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.secret)
            .json(&extraction_payload(url))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    AppError::NetworkError(format!("Connection failed: {e}"))
                } else {
                    AppError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderError {
                message,
                status_code: status.as_u16(),
            });
        }

        let body: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to parse scrape response: {e}")))?;

        tracing::info!(url, count = body.jobs.len(), "Fallback extraction completed");
        Ok(body.jobs)
    }
}
