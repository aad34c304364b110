// src/types.rs
// Core data model for the delegation and update aggregation pipeline.
// Wire field names are snake_case to match the governance data provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Wallet address. Equality is exact string match; `Option<Address>` models
/// "no wallet connected".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One governance-token balance held by the wallet. The holdings collection
/// is keyed by `dao_slug` — resolvers deduplicate before returning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub dao_slug: String,
    /// Raw balance as a numeric string (token base units, provider-side).
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}

impl TokenHolding {
    /// A holding counts as nonzero when the amount parses to a value > 0.
    /// Unparseable amounts are treated as zero rather than trusted.
    pub fn is_nonzero(&self) -> bool {
        self.amount.parse::<f64>().map(|v| v > 0.0).unwrap_or(false)
    }
}

/// Look up whether `holdings` contains a nonzero balance for `dao_slug`.
pub fn has_nonzero_holding(holdings: &[TokenHolding], dao_slug: &str) -> bool {
    holdings
        .iter()
        .any(|h| h.dao_slug == dao_slug && h.is_nonzero())
}

/// A single DAO delegation opportunity, as categorized by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationRecord {
    pub dao_slug: String,
    pub dao_name: String,
    pub token_amount: String,
    pub has_active_proposals: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposals_count: Option<u32>,
}

/// The three categorized delegation lists for one address. Replaced wholesale
/// on every successful aggregation; discarded when the address goes absent.
///
/// `active` and `available` slug sets are disjoint. `recommended` is sourced
/// independently and may overlap either list — no cross-category dedup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationsData {
    pub active: Vec<DelegationRecord>,
    pub available: Vec<DelegationRecord>,
    pub recommended: Vec<DelegationRecord>,
}

impl DelegationsData {
    /// Deduplicated union of active + available slugs, in first-seen order.
    /// This is the input set for the update feed — recommended DAOs carry no
    /// stake and generate no updates.
    pub fn staked_dao_slugs(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.active
            .iter()
            .chain(self.available.iter())
            .filter(|d| seen.insert(d.dao_slug.clone()))
            .map(|d| d.dao_slug.clone())
            .collect()
    }

    /// Collapse the three lists into one, resolving slug ties in favor of
    /// active over available over recommended. Only relevant for consumers
    /// that render a single merged list; the stored lists stay separate.
    pub fn collapsed(&self) -> Vec<DelegationRecord> {
        let mut seen = HashSet::new();
        self.active
            .iter()
            .chain(self.available.iter())
            .chain(self.recommended.iter())
            .filter(|d| seen.insert(d.dao_slug.clone()))
            .cloned()
            .collect()
    }
}

/// Urgency classification of a governance update: urgent > important > fyi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePriority {
    Urgent,
    Important,
    Fyi,
}

/// What kind of governance event an update describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateCategory {
    Proposal,
    Treasury,
    Governance,
    Social,
}

/// Call-to-action attached to an update (vote link, delegate link, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAction {
    #[serde(rename = "type")]
    pub kind: UpdateActionKind,
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateActionKind {
    Link,
    Vote,
    Delegate,
}

/// One governance update in the feed. `id` is unique within a feed; ordering
/// within the returned sequence is provider order, not priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaoUpdate {
    pub id: String,
    pub dao_slug: String,
    pub dao_name: String,
    pub title: String,
    pub description: String,
    pub priority: UpdatePriority,
    pub category: UpdateCategory,
    pub timestamp: DateTime<Utc>,
    /// Provider-specific extras (impact analysis, sentiment, treasury deltas).
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub actions: Vec<UpdateAction>,
}
