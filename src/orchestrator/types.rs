// src/orchestrator/types.rs
// State owned by the orchestrator plus the display-time grouping derivation.

use crate::types::{DaoUpdate, DelegationsData, UpdatePriority};
use serde::{Deserialize, Serialize};

/// Where the pipeline is for the current address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelinePhase {
    /// No wallet connected.
    #[default]
    Idle,
    /// A fetch for the current address is in flight.
    Loading,
    /// All three stages succeeded and their results are committed.
    Ready,
    /// Some stage failed; `error` carries the user-facing message.
    Failed,
}

/// The single process-local state a presentation layer reads reactively.
///
/// `delegations` and `updates` always belong to the same address: stale runs
/// are suppressed before every commit, and the state is fully reset whenever
/// the address changes or goes absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub phase: PipelinePhase,
    pub delegations: Option<DelegationsData>,
    pub updates: Vec<DaoUpdate>,
    pub error: Option<String>,
}

impl PipelineState {
    pub fn is_loading(&self) -> bool {
        self.phase == PipelinePhase::Loading
    }

    /// Reset to the no-wallet baseline. Used on disconnect and at the start
    /// of every new fetch.
    pub fn clear(&mut self) {
        self.phase = PipelinePhase::Idle;
        self.delegations = None;
        self.updates.clear();
        self.error = None;
    }
}

/// Priority buckets for display. Derived, never stored: always recompute from
/// `PipelineState.updates` so the partition cannot drift from the feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupedUpdates {
    pub urgent: Vec<DaoUpdate>,
    pub important: Vec<DaoUpdate>,
    pub fyi: Vec<DaoUpdate>,
}

impl GroupedUpdates {
    /// Partition a feed by priority, preserving relative order within each
    /// bucket. Empty buckets are valid; "no updates at all" is visible only
    /// on the parent feed.
    pub fn partition(updates: &[DaoUpdate]) -> Self {
        let mut grouped = Self::default();
        for update in updates {
            match update.priority {
                UpdatePriority::Urgent => grouped.urgent.push(update.clone()),
                UpdatePriority::Important => grouped.important.push(update.clone()),
                UpdatePriority::Fyi => grouped.fyi.push(update.clone()),
            }
        }
        grouped
    }

    pub fn total(&self) -> usize {
        self.urgent.len() + self.important.len() + self.fyi.len()
    }
}
