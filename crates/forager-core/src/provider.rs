//! The primary-to-fallback provider chain.
//!
//! The primary provider runs a hosted actor against the source's stored
//! input; the fallback does generic keyword/selector extraction against
//! the source URL. Fallback failures never escalate: they yield an empty
//! item set with the reason recorded.

use std::future::Future;

use serde_json::Value;

use crate::error::AppError;
use crate::source::Source;
use crate::traits::{RunLogger, RunStore};

/// Runs a hosted scraping actor and returns its dataset items.
pub trait ActorProvider: Send + Sync + Clone {
    fn run_actor(
        &self,
        actor_id: &str,
        input: &Value,
    ) -> impl Future<Output = Result<Vec<Value>, AppError>> + Send;
}

/// Best-effort generic extraction against a page URL.
pub trait FallbackProvider: Send + Sync + Clone {
    fn extract(&self, url: &str) -> impl Future<Output = Result<Vec<Value>, AppError>> + Send;
}

/// Which path produced the fetched items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPath {
    Primary,
    Fallback,
    /// The primary failed and the fallback failed too; the run continues
    /// with zero items rather than aborting.
    FallbackFailed { reason: String },
}

/// Raw items plus the provenance of the fetch.
#[derive(Debug, Clone)]
pub struct FetchReport {
    pub items: Vec<Value>,
    pub via: FetchPath,
}

/// Fetches raw listings for a source: primary first, then the configured
/// fallback. `None` for either provider means that credential is not
/// configured.
#[derive(Clone)]
pub struct ProviderChain<P, B>
where
    P: ActorProvider,
    B: FallbackProvider,
{
    primary: Option<P>,
    fallback: Option<B>,
}

impl<P, B> ProviderChain<P, B>
where
    P: ActorProvider,
    B: FallbackProvider,
{
    pub fn new(primary: Option<P>, fallback: Option<B>) -> Self {
        Self { primary, fallback }
    }

    /// Fetch raw items for a source, logging every attempt so operators
    /// can reconstruct which path produced the data.
    ///
    /// - No primary token configured: fail immediately, no fallback.
    /// - Primary failure with a fallback configured: try the fallback.
    /// - Fallback failure: swallowed, empty item set.
    pub async fn fetch<R: RunStore>(
        &self,
        source: &Source,
        log: &RunLogger<R>,
    ) -> Result<FetchReport, AppError> {
        let Some(primary) = &self.primary else {
            return Err(AppError::ConfigError(
                "Provider API token required for scraping".into(),
            ));
        };

        if !source.is_actor_source() {
            return Err(AppError::ConfigError(format!(
                "Unsupported scraper type: {}",
                source.scraper_type
            )));
        }

        let actor_id = source.actor_id().ok_or_else(|| {
            AppError::ConfigError("Source config is missing actorId".into())
        })?;

        log.log(format!("Running actor: {actor_id}")).await;

        match primary.run_actor(actor_id, &source.actor_input()).await {
            Ok(items) => {
                log.log(format!("Actor returned {} items", items.len())).await;
                Ok(FetchReport {
                    items,
                    via: FetchPath::Primary,
                })
            }
            Err(err) if err.is_provider_failure() => {
                log.log(format!("Actor failed: {err}")).await;

                let Some(fallback) = &self.fallback else {
                    return Err(err);
                };

                log.log("Falling back to browser extraction...").await;
                match fallback.extract(&source.url).await {
                    Ok(items) => {
                        log.log(format!("Fallback returned {} items", items.len()))
                            .await;
                        Ok(FetchReport {
                            items,
                            via: FetchPath::Fallback,
                        })
                    }
                    Err(fallback_err) => {
                        log.log(format!("Fallback failed: {fallback_err}")).await;
                        Ok(FetchReport {
                            items: Vec::new(),
                            via: FetchPath::FallbackFailed {
                                reason: fallback_err.to_string(),
                            },
                        })
                    }
                }
            }
            Err(err) => Err(err),
        }
    }
}
