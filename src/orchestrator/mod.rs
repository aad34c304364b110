//! Pipeline orchestrator - sequences the three resolvers per address change
//!
//! One cooperative flow per address-change event: holdings, then delegation
//! categorization, then the update feed, each stage short-circuiting on
//! failure. Overlapping address changes are legal; correctness is
//! last-write-wins with an ignore-if-superseded check before every state
//! commit (a generation counter, no cancellation primitive).

mod types;

pub use types::{GroupedUpdates, PipelinePhase, PipelineState};

use crate::error::{PipelineError, USER_FACING_FETCH_ERROR};
use crate::services::{DelegationAggregator, HoldingsResolver, UpdateFeedBuilder};
use crate::types::{Address, DaoUpdate, DelegationsData};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

pub struct Orchestrator {
    holdings: Arc<dyn HoldingsResolver>,
    delegations: Arc<dyn DelegationAggregator>,
    updates: Arc<dyn UpdateFeedBuilder>,
    state: Arc<RwLock<PipelineState>>,
    /// Bumped once per address-change event; each run captures its value and
    /// may only commit while it is still the latest.
    generation: AtomicU64,
}

impl Orchestrator {
    pub fn new(
        holdings: Arc<dyn HoldingsResolver>,
        delegations: Arc<dyn DelegationAggregator>,
        updates: Arc<dyn UpdateFeedBuilder>,
    ) -> Self {
        Self {
            holdings,
            delegations,
            updates,
            state: Arc::new(RwLock::new(PipelineState::default())),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current state for a presentation layer to read.
    pub async fn snapshot(&self) -> PipelineState {
        self.state.read().await.clone()
    }

    /// Display-time derivation: partition the feed into priority buckets.
    /// Pure function of `updates`; never stored back into state.
    pub fn grouped_updates(updates: &[DaoUpdate]) -> GroupedUpdates {
        GroupedUpdates::partition(updates)
    }

    /// React to the wallet address changing. `None` means disconnected.
    ///
    /// Safe to call concurrently: each call starts a new generation, and any
    /// older run still in flight becomes unable to commit from that point on.
    pub async fn handle_address_change(&self, address: Option<Address>) {
        // fetch_add + 1 is this run's token; any later call observes a
        // larger counter and supersedes us.
        let run = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(address) = address else {
            if self.commit(run, |state| state.clear()).await {
                info!("Wallet disconnected, pipeline idle");
            }
            return;
        };

        // Enter Loading with a clean slate so a Failed outcome cannot sit
        // next to data from the previous address.
        let entered = self
            .commit(run, |state| {
                state.clear();
                state.phase = PipelinePhase::Loading;
            })
            .await;
        if !entered {
            return;
        }
        info!("Pipeline started for {}", address);

        match self.run_pipeline(&address).await {
            Ok((delegations, updates)) => {
                let committed = self
                    .commit(run, |state| {
                        state.phase = PipelinePhase::Ready;
                        state.delegations = Some(delegations);
                        state.updates = updates;
                        state.error = None;
                    })
                    .await;
                if committed {
                    info!("Pipeline ready for {}", address);
                }
            }
            Err(err) => {
                // Full cause to the logs, generic message to the user.
                error!("Pipeline stage '{}' failed for {}: {}", err.stage(), address, err);
                self.commit(run, |state| {
                    state.phase = PipelinePhase::Failed;
                    state.error = Some(USER_FACING_FETCH_ERROR.to_string());
                })
                .await;
            }
        }
    }

    /// The strictly sequential three-stage fetch. Stage order matters: each
    /// call consumes the previous result, and `?` short-circuits the rest.
    async fn run_pipeline(
        &self,
        address: &Address,
    ) -> Result<(DelegationsData, Vec<DaoUpdate>), PipelineError> {
        let holdings = self.holdings.resolve(address).await?;
        debug!("{} holdings for {}", holdings.len(), address);

        let delegations = self.delegations.aggregate(address, &holdings).await?;
        debug!(
            "Delegations for {}: {} active, {} available, {} recommended",
            address,
            delegations.active.len(),
            delegations.available.len(),
            delegations.recommended.len()
        );

        let dao_slugs = delegations.staked_dao_slugs();
        let updates = self.updates.build(&dao_slugs, &holdings).await?;
        debug!("{} updates for {}", updates.len(), address);

        Ok((delegations, updates))
    }

    /// Apply a state mutation only if this run is still the latest. The
    /// generation is re-checked under the write lock, so a newer run that has
    /// already started can never be overwritten by an older one finishing.
    async fn commit<F>(&self, run: u64, mutate: F) -> bool
    where
        F: FnOnce(&mut PipelineState),
    {
        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != run {
            debug!("Dropping stale pipeline result (run {})", run);
            return false;
        }
        mutate(&mut state);
        true
    }
}
