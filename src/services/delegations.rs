// src/services/delegations.rs
// Second pipeline stage: address + holdings -> three categorized delegation
// lists (active / available / recommended).

use crate::config::CONFIG;
use crate::error::PipelineError;
use crate::types::{has_nonzero_holding, Address, DelegationRecord, DelegationsData, TokenHolding};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

/// Categorizes delegation opportunities for an address.
///
/// Consumes the holdings produced by the holdings resolver rather than
/// re-deriving them: a DAO is *available* iff the wallet holds a nonzero
/// balance of its token and is not already in *active*. *Recommended* is
/// independent of holdings and may overlap the other two lists.
#[async_trait]
pub trait DelegationAggregator: Send + Sync {
    async fn aggregate(
        &self,
        address: &Address,
        holdings: &[TokenHolding],
    ) -> Result<DelegationsData, PipelineError>;
}

#[derive(Debug, Serialize)]
struct DelegationsRequest<'a> {
    address: &'a Address,
    holdings: &'a [TokenHolding],
    recommended_limit: usize,
}

#[derive(Debug, Deserialize)]
struct DelegationsResponse {
    #[serde(default)]
    active_delegations: Vec<DelegationRecord>,
    #[serde(default)]
    available_delegations: Vec<DelegationRecord>,
    #[serde(default)]
    recommended_delegations: Vec<DelegationRecord>,
}

pub struct HttpDelegationAggregator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    recommended_limit: usize,
}

impl HttpDelegationAggregator {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(CONFIG.http_timeout_secs))
            .build()
            .context("failed to build delegations HTTP client")?;

        Ok(Self {
            client,
            base_url: CONFIG.provider_base_url.clone(),
            api_key: CONFIG.tally_api_key.clone(),
            recommended_limit: CONFIG.recommended_dao_limit,
        })
    }
}

#[async_trait]
impl DelegationAggregator for HttpDelegationAggregator {
    async fn aggregate(
        &self,
        address: &Address,
        holdings: &[TokenHolding],
    ) -> Result<DelegationsData, PipelineError> {
        let url = format!("{}/delegations", self.base_url);
        debug!(
            "Fetching delegations for {} ({} holdings)",
            address,
            holdings.len()
        );

        let mut request = self.client.post(&url).json(&DelegationsRequest {
            address,
            holdings,
            recommended_limit: self.recommended_limit,
        });
        if let Some(key) = &self.api_key {
            request = request.header("Api-Key", key);
        }

        let body: DelegationsResponse = async {
            let response = request
                .send()
                .await
                .with_context(|| format!("POST {} failed", url))?
                .error_for_status()
                .context("provider returned an error status for delegations")?;
            response
                .json()
                .await
                .context("failed to parse delegations response")
        }
        .await
        .map_err(PipelineError::DelegationFetch)?;

        Ok(categorize(body, holdings))
    }
}

/// Re-assert the categorization invariants over the raw provider lists:
/// an *available* entry must be backed by a nonzero holding and must not
/// already be *active* (active wins the tie). Recommended passes through
/// untouched — it is independently sourced and allowed to overlap.
fn categorize(response: DelegationsResponse, holdings: &[TokenHolding]) -> DelegationsData {
    let active_slugs: HashSet<&str> = response
        .active_delegations
        .iter()
        .map(|d| d.dao_slug.as_str())
        .collect();

    let available = response
        .available_delegations
        .into_iter()
        .filter(|d| {
            !active_slugs.contains(d.dao_slug.as_str())
                && has_nonzero_holding(holdings, &d.dao_slug)
        })
        .collect();

    DelegationsData {
        active: response.active_delegations,
        available,
        recommended: response.recommended_delegations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(slug: &str) -> DelegationRecord {
        DelegationRecord {
            dao_slug: slug.to_string(),
            dao_name: slug.to_uppercase(),
            token_amount: "100".to_string(),
            has_active_proposals: false,
            proposals_count: None,
        }
    }

    fn holding(slug: &str, amount: &str) -> TokenHolding {
        TokenHolding {
            dao_slug: slug.to_string(),
            amount: amount.to_string(),
            decimals: None,
        }
    }

    #[test]
    fn available_requires_nonzero_holding() {
        let response = DelegationsResponse {
            active_delegations: vec![],
            available_delegations: vec![record("daoX"), record("daoY")],
            recommended_delegations: vec![],
        };
        let holdings = vec![holding("daoX", "100"), holding("daoY", "0")];
        let data = categorize(response, &holdings);
        assert_eq!(data.available.len(), 1);
        assert_eq!(data.available[0].dao_slug, "daoX");
    }

    #[test]
    fn active_wins_over_available_for_the_same_dao() {
        let response = DelegationsResponse {
            active_delegations: vec![record("daoX")],
            available_delegations: vec![record("daoX"), record("daoY")],
            recommended_delegations: vec![],
        };
        let holdings = vec![holding("daoX", "100"), holding("daoY", "50")];
        let data = categorize(response, &holdings);
        assert_eq!(data.active.len(), 1);
        assert_eq!(data.available.len(), 1);
        assert_eq!(data.available[0].dao_slug, "daoY");
    }

    #[test]
    fn empty_holdings_empty_available() {
        let response = DelegationsResponse {
            active_delegations: vec![record("daoX")],
            available_delegations: vec![record("daoY"), record("daoZ")],
            recommended_delegations: vec![record("daoW")],
        };
        let data = categorize(response, &[]);
        assert!(data.available.is_empty());
        assert_eq!(data.active.len(), 1);
        assert_eq!(data.recommended.len(), 1);
    }

    #[test]
    fn recommended_may_overlap_active() {
        let response = DelegationsResponse {
            active_delegations: vec![record("daoX")],
            available_delegations: vec![],
            recommended_delegations: vec![record("daoX")],
        };
        let data = categorize(response, &[holding("daoX", "5")]);
        assert_eq!(data.active.len(), 1);
        assert_eq!(data.recommended.len(), 1);
    }
}
