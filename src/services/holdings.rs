// src/services/holdings.rs
// Leaf of the pipeline: wallet address -> governance token balances.

use crate::config::CONFIG;
use crate::error::PipelineError;
use crate::types::{Address, TokenHolding};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

/// Resolves the set of governance-token balances an address holds.
///
/// Pure read, no retries. Zero holdings is `Ok(vec![])`, never an error.
#[async_trait]
pub trait HoldingsResolver: Send + Sync {
    async fn resolve(&self, address: &Address) -> Result<Vec<TokenHolding>, PipelineError>;
}

/// Provider response shape. Private to this resolver — the HTTP contract is
/// an implementation detail, not part of the pipeline's API.
#[derive(Debug, Deserialize)]
struct HoldingsResponse {
    holdings: Vec<TokenHolding>,
}

pub struct HttpHoldingsResolver {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpHoldingsResolver {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(CONFIG.http_timeout_secs))
            .build()
            .context("failed to build holdings HTTP client")?;

        Ok(Self {
            client,
            base_url: CONFIG.provider_base_url.clone(),
            api_key: CONFIG.tally_api_key.clone(),
        })
    }
}

#[async_trait]
impl HoldingsResolver for HttpHoldingsResolver {
    async fn resolve(&self, address: &Address) -> Result<Vec<TokenHolding>, PipelineError> {
        let url = format!("{}/wallets/{}/holdings", self.base_url, address);
        debug!("Fetching token holdings for {}", address);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("Api-Key", key);
        }

        let body: HoldingsResponse = async {
            let response = request
                .send()
                .await
                .with_context(|| format!("GET {} failed", url))?
                .error_for_status()
                .context("provider returned an error status for holdings")?;
            response
                .json()
                .await
                .context("failed to parse holdings response")
        }
        .await
        .map_err(PipelineError::HoldingsFetch)?;

        Ok(dedup_nonzero(body.holdings))
    }
}

/// Drop zero balances and duplicate slugs (first entry wins). The collection
/// is keyed by dao_slug downstream.
fn dedup_nonzero(holdings: Vec<TokenHolding>) -> Vec<TokenHolding> {
    let mut seen = HashSet::new();
    holdings
        .into_iter()
        .filter(|h| h.is_nonzero() && seen.insert(h.dao_slug.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(slug: &str, amount: &str) -> TokenHolding {
        TokenHolding {
            dao_slug: slug.to_string(),
            amount: amount.to_string(),
            decimals: Some(18),
        }
    }

    #[test]
    fn dedup_drops_zero_balances_and_duplicate_slugs() {
        let holdings = vec![
            holding("daoX", "100"),
            holding("daoY", "0"),
            holding("daoX", "999"),
            holding("daoZ", "3.5"),
        ];
        let result = dedup_nonzero(holdings);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].dao_slug, "daoX");
        assert_eq!(result[0].amount, "100");
        assert_eq!(result[1].dao_slug, "daoZ");
    }

    #[test]
    fn empty_holdings_stay_empty() {
        assert!(dedup_nonzero(vec![]).is_empty());
    }
}
