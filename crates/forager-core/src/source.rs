use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Last-known status of a configured source, updated on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Idle,
    Running,
    Success,
    Error,
}

impl SourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceStatus::Idle => "idle",
            SourceStatus::Running => "running",
            SourceStatus::Success => "success",
            SourceStatus::Error => "error",
        }
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(SourceStatus::Idle),
            "running" => Ok(SourceStatus::Running),
            "success" => Ok(SourceStatus::Success),
            "error" => Ok(SourceStatus::Error),
            _ => Err(format!("Unknown source status: {}", s)),
        }
    }
}

/// Scraper type tag for an actor-run provider.
pub const SCRAPER_TYPE_APIFY_ACTOR: &str = "apify_actor";

/// A configured scrape target.
///
/// Created by source management; after that only the orchestrator mutates
/// it (status, timestamp, error) on each run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub scraper_type: String,
    /// Provider configuration blob. For actor sources this holds
    /// `actorId` and `input`.
    pub config: serde_json::Value,
    pub enabled: bool,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_status: SourceStatus,
    pub last_error: Option<String>,
    pub template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Source {
    /// Actor ID from the config blob, if present.
    pub fn actor_id(&self) -> Option<&str> {
        self.config.get("actorId").and_then(|v| v.as_str())
    }

    /// Actor input payload from the config blob, defaulting to `{}`.
    pub fn actor_input(&self) -> serde_json::Value {
        self.config
            .get("input")
            .cloned()
            .unwrap_or_else(|| serde_json::json!({}))
    }

    pub fn is_actor_source(&self) -> bool {
        self.scraper_type == SCRAPER_TYPE_APIFY_ACTOR
    }
}

/// Request to create a new source.
#[derive(Debug, Clone)]
pub struct CreateSourceRequest {
    pub name: String,
    pub url: String,
    pub scraper_type: String,
    pub config: serde_json::Value,
    pub template_id: Option<Uuid>,
}

impl CreateSourceRequest {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            scraper_type: SCRAPER_TYPE_APIFY_ACTOR.to_string(),
            config: serde_json::json!({}),
            template_id: None,
        }
    }

    pub fn with_scraper_type(mut self, scraper_type: impl Into<String>) -> Self {
        self.scraper_type = scraper_type.into();
        self
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = config;
        self
    }

    pub fn with_template(mut self, template_id: Uuid) -> Self {
        self.template_id = Some(template_id);
        self
    }
}

/// Entry in the read-only catalog of known job boards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTemplate {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub scraper_type: String,
    pub config: serde_json::Value,
    pub is_default: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
