// src/state.rs
// AppState wires the three resolver implementations into the orchestrator.

use crate::orchestrator::Orchestrator;
use crate::services::{
    DelegationAggregator, HoldingsResolver, HttpDelegationAggregator, HttpHoldingsResolver,
    HttpUpdateFeedBuilder, UpdateFeedBuilder,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Production wiring: all three resolvers talk to the configured
    /// governance data provider over HTTP.
    pub fn from_config() -> anyhow::Result<Self> {
        let holdings = Arc::new(HttpHoldingsResolver::new()?);
        let delegations = Arc::new(HttpDelegationAggregator::new()?);
        let updates = Arc::new(HttpUpdateFeedBuilder::new()?);
        Ok(Self::with_resolvers(holdings, delegations, updates))
    }

    /// Assemble from explicit resolvers. Tests substitute mocks here.
    pub fn with_resolvers(
        holdings: Arc<dyn HoldingsResolver>,
        delegations: Arc<dyn DelegationAggregator>,
        updates: Arc<dyn UpdateFeedBuilder>,
    ) -> Self {
        Self {
            orchestrator: Arc::new(Orchestrator::new(holdings, delegations, updates)),
        }
    }
}
