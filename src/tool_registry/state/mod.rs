//! Process-wide registry state: catalogue, connection tracker and call
//! ledger.
//!
//! Each component guards its own map. Writes to one server serialize on
//! that server's entry, so unrelated servers never contend beyond the brief
//! map lookup, and readers only ever observe whole transitions.

mod error;
mod ledger;
mod registry;
mod tracker;

pub use error::{RegistryError, RegistryResult};
pub use ledger::{CallLedger, CallWindow, RecentCalls};
pub use registry::ServerRegistry;
pub use tracker::ConnectionTracker;

use crate::config::RetentionPolicy;
use std::sync::Arc;

/// Shared handles to the registry, tracker and ledger of one process.
///
/// Cloning shares the same underlying state.
#[derive(Debug, Clone)]
pub struct McpState {
    /// Server catalogue.
    pub registry: Arc<ServerRegistry>,
    /// Connection states.
    pub tracker: Arc<ConnectionTracker>,
    /// Call history.
    pub ledger: Arc<CallLedger>,
}

impl McpState {
    /// Wraps a registry (empty or pre-seeded) with a fresh tracker and
    /// ledger.
    #[must_use]
    pub fn new(registry: ServerRegistry, retention: RetentionPolicy) -> Self {
        let registry = Arc::new(registry);
        Self {
            ledger: Arc::new(CallLedger::new(Arc::clone(&registry), retention)),
            tracker: Arc::new(ConnectionTracker::new()),
            registry,
        }
    }
}
