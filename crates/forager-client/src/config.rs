use forager_core::AppError;

const DEFAULT_APIFY_BASE_URL: &str = "https://api.apify.com/v2";
const DEFAULT_BROWSERUSE_BASE_URL: &str = "https://api.browseruse.ai";

/// Provider credentials and endpoints, read once at process start.
///
/// Either token may be absent: a missing Apify token makes every run fail
/// with a config error, a missing BrowserUse secret disables the fallback.
/// The base URLs are overridable so tests can point the clients at a local
/// server.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub apify_token: Option<String>,
    pub apify_base_url: String,
    pub browseruse_secret: Option<String>,
    pub browseruse_base_url: String,
}

impl ProviderConfig {
    /// Read configuration from environment variables.
    ///
    /// - `APIFY_API_TOKEN` (optional)
    /// - `BROWSERUSE_API_SECRET` (optional)
    /// - `APIFY_BASE_URL` / `BROWSERUSE_BASE_URL` (optional overrides)
    pub fn from_env() -> Self {
        Self {
            apify_token: non_empty_var("APIFY_API_TOKEN"),
            apify_base_url: non_empty_var("APIFY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_APIFY_BASE_URL.to_string()),
            browseruse_secret: non_empty_var("BROWSERUSE_API_SECRET"),
            browseruse_base_url: non_empty_var("BROWSERUSE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BROWSERUSE_BASE_URL.to_string()),
        }
    }

    /// Config with no credentials and default endpoints.
    pub fn disabled() -> Self {
        Self {
            apify_token: None,
            apify_base_url: DEFAULT_APIFY_BASE_URL.to_string(),
            browseruse_secret: None,
            browseruse_base_url: DEFAULT_BROWSERUSE_BASE_URL.to_string(),
        }
    }

    /// Build an [`ApifyClient`](crate::ApifyClient) if a token is configured.
    pub fn apify_client(&self) -> Result<Option<crate::ApifyClient>, AppError> {
        self.apify_token
            .as_deref()
            .map(|token| crate::ApifyClient::with_base_url(token, &self.apify_base_url))
            .transpose()
    }

    /// Build a [`BrowserUseClient`](crate::BrowserUseClient) if a secret is
    /// configured.
    pub fn browseruse_client(&self) -> Result<Option<crate::BrowserUseClient>, AppError> {
        self.browseruse_secret
            .as_deref()
            .map(|secret| crate::BrowserUseClient::with_base_url(secret, &self.browseruse_base_url))
            .transpose()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
