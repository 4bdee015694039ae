//! Actor discovery: search the store for scrapers matching a job board URL
//! and rank the candidates.

use forager_core::error::AppError;
use serde::Serialize;
use url::Url;

use crate::apify::{ApifyClient, StoreActor};

/// A ranked actor suggestion for a job board.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRecommendation {
    pub id: String,
    pub name: String,
    pub title: String,
    pub description: String,
    pub username: String,
    pub pricing: String,
    pub stats: RecommendationStats,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationStats {
    pub total_runs: u64,
    pub avg_run_time: String,
}

/// Search the actor store with board-specific and generic queries, keep
/// job-related actors, and return the top 3 by score.
pub async fn discover_actors(
    client: &ApifyClient,
    board_url: &str,
) -> Result<Vec<ActorRecommendation>, AppError> {
    let domain = Url::parse(board_url)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .ok_or_else(|| AppError::Generic(format!("Invalid URL: {board_url}")))?;

    let queries = [
        format!("{domain} scraper"),
        "remote job scraper".to_string(),
        "job board scraper".to_string(),
    ];

    let mut recommendations = Vec::new();
    for query in &queries {
        // One failed search query does not fail discovery.
        match client.search_store(query).await {
            Ok(actors) => {
                recommendations.extend(
                    actors
                        .into_iter()
                        .filter(is_job_actor)
                        .map(|actor| rank_actor(actor, &domain)),
                );
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "Store search failed, skipping query");
            }
        }
    }

    recommendations.sort_by(|a, b| b.score.cmp(&a.score));
    recommendations.truncate(3);
    Ok(recommendations)
}

/// Canned generic-scraper suggestion when no job actor matched.
pub fn generic_fallback_recommendation() -> ActorRecommendation {
    ActorRecommendation {
        id: "apify/web-scraper".to_string(),
        name: "web-scraper".to_string(),
        title: "Web Scraper".to_string(),
        description: "Generic web scraper that can extract data from any website".to_string(),
        username: "apify".to_string(),
        pricing: "~$0.10/1k pages".to_string(),
        stats: RecommendationStats {
            total_runs: 1_000_000,
            avg_run_time: "~2-10 min".to_string(),
        },
        score: 100,
    }
}

fn is_job_actor(actor: &StoreActor) -> bool {
    actor.title.to_lowercase().contains("job")
        || actor
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains("job"))
}

/// Score an actor: domain match in the title weighs most, then run volume
/// and pricing model.
fn rank_actor(actor: StoreActor, domain: &str) -> ActorRecommendation {
    let total_runs = actor.stats.as_ref().map(|s| s.total_runs).unwrap_or(0);
    let pricing_model = actor.user_pricing_model.as_deref().unwrap_or("");

    let mut score = 0u32;
    if actor.title.to_lowercase().contains(domain) {
        score += 50;
    }
    if total_runs > 1000 {
        score += 20;
    }
    if total_runs > 10000 {
        score += 30;
    }
    if pricing_model.contains("FREE") {
        score += 40;
    }
    if pricing_model.contains("TRIAL") {
        score += 30;
    }

    let pricing = if pricing_model.contains("FREE") {
        "Free".to_string()
    } else {
        "~$0.10/1k pages".to_string()
    };

    ActorRecommendation {
        id: actor.id,
        name: actor.name,
        title: actor.title,
        description: actor
            .description
            .unwrap_or_else(|| "No description available".to_string()),
        username: actor.username,
        pricing,
        stats: RecommendationStats {
            total_runs,
            avg_run_time: "~1-5 min".to_string(),
        },
        score,
    }
}
