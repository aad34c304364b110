// src/services/mod.rs
// The three resolver seams of the aggregation pipeline, each a trait plus a
// reqwest-backed implementation against the governance data provider.

pub mod delegations;
pub mod holdings;
pub mod updates;

pub use delegations::{DelegationAggregator, HttpDelegationAggregator};
pub use holdings::{HoldingsResolver, HttpHoldingsResolver};
pub use updates::{HttpUpdateFeedBuilder, UpdateFeedBuilder};
