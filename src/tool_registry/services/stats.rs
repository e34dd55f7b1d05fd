//! On-demand statistics over the registry, tracker and ledger.

use crate::tool_registry::{
    domain::{ConnectionStatus, ServerCallStats, ServerId, ServerSample, ServerStats},
    state::{McpState, RegistryResult},
};

/// Derives fleet-wide and per-server call metrics.
///
/// Nothing is cached: each query reads the current state of every
/// component, one server at a time.
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    state: McpState,
}

impl StatsAggregator {
    /// Creates an aggregator over shared registry state.
    #[must_use]
    pub const fn new(state: McpState) -> Self {
        Self { state }
    }

    /// Computes the fleet summary for every registered server.
    ///
    /// # Errors
    ///
    /// Returns [`crate::tool_registry::state::RegistryError::LockPoisoned`]
    /// when a component lock is poisoned.
    pub fn compute_server_stats(&self) -> RegistryResult<ServerStats> {
        let descriptors = self.state.registry.list()?;
        let states = self.state.tracker.snapshot()?;

        let samples = descriptors
            .iter()
            .map(|descriptor| {
                let active = states
                    .get(descriptor.id())
                    .is_some_and(|state| state.status() == ConnectionStatus::Active);
                Ok(ServerSample {
                    totals: self.state.ledger.totals(descriptor.id())?,
                    active,
                })
            })
            .collect::<RegistryResult<Vec<_>>>()?;

        Ok(ServerStats::aggregate(&samples))
    }

    /// Computes call metrics for one server.
    ///
    /// # Errors
    ///
    /// Returns [`crate::tool_registry::state::RegistryError::NotFound`] for
    /// an unknown server.
    pub fn server_call_stats(&self, server_id: &ServerId) -> RegistryResult<ServerCallStats> {
        Ok(self.state.ledger.totals(server_id)?.into())
    }
}
