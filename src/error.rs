// src/error.rs
// Typed errors for the three pipeline stages. The orchestrator collapses any
// of these into a single user-facing message and a tracing diagnostic.

use thiserror::Error;

/// Generic message shown to the user when any pipeline stage fails. The real
/// cause goes to the logs, never to the UI.
pub const USER_FACING_FETCH_ERROR: &str = "Failed to fetch DAO data";

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Token holdings lookup failed (network or parse).
    #[error("holdings fetch failed: {0:#}")]
    HoldingsFetch(anyhow::Error),

    /// Delegation categorization failed (network or parse).
    #[error("delegation fetch failed: {0:#}")]
    DelegationFetch(anyhow::Error),

    /// Update feed fetch failed (network or parse).
    #[error("update fetch failed: {0:#}")]
    UpdateFetch(anyhow::Error),
}

impl PipelineError {
    /// Which stage produced this error, for log lines and metrics keys.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::HoldingsFetch(_) => "holdings",
            PipelineError::DelegationFetch(_) => "delegations",
            PipelineError::UpdateFetch(_) => "updates",
        }
    }
}
