// src/services/updates.rs
// Third pipeline stage: staked DAO slugs + holdings -> governance update feed.

use crate::config::CONFIG;
use crate::error::PipelineError;
use crate::types::{DaoUpdate, TokenHolding};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Builds the governance update feed for the DAOs the wallet has a stake in.
///
/// `dao_slugs` is the deduplicated union of active + available delegation
/// slugs — recommended DAOs generate no updates. An empty slug list returns
/// an empty feed without touching the network (an empty batch request would
/// be rejected upstream anyway).
#[async_trait]
pub trait UpdateFeedBuilder: Send + Sync {
    async fn build(
        &self,
        dao_slugs: &[String],
        holdings: &[TokenHolding],
    ) -> Result<Vec<DaoUpdate>, PipelineError>;
}

#[derive(Debug, Serialize)]
struct UpdatesRequest<'a> {
    dao_slugs: &'a [String],
    holdings: &'a [TokenHolding],
}

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    updates: Vec<DaoUpdate>,
}

pub struct HttpUpdateFeedBuilder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpUpdateFeedBuilder {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(CONFIG.http_timeout_secs))
            .build()
            .context("failed to build updates HTTP client")?;

        Ok(Self {
            client,
            base_url: CONFIG.provider_base_url.clone(),
            api_key: CONFIG.tally_api_key.clone(),
        })
    }
}

#[async_trait]
impl UpdateFeedBuilder for HttpUpdateFeedBuilder {
    async fn build(
        &self,
        dao_slugs: &[String],
        holdings: &[TokenHolding],
    ) -> Result<Vec<DaoUpdate>, PipelineError> {
        if dao_slugs.is_empty() {
            debug!("No staked DAOs, skipping update fetch");
            return Ok(Vec::new());
        }

        let url = format!("{}/updates", self.base_url);
        debug!("Fetching updates for {} DAOs", dao_slugs.len());

        let mut request = self.client.post(&url).json(&UpdatesRequest {
            dao_slugs,
            holdings,
        });
        if let Some(key) = &self.api_key {
            request = request.header("Api-Key", key);
        }

        let body: UpdatesResponse = async {
            let response = request
                .send()
                .await
                .with_context(|| format!("POST {} failed", url))?
                .error_for_status()
                .context("provider returned an error status for updates")?;
            response
                .json()
                .await
                .context("failed to parse updates response")
        }
        .await
        .map_err(PipelineError::UpdateFetch)?;

        Ok(body.updates)
    }
}
