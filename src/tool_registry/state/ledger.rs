//! Append-only record of tool invocations per server.

use super::{RegistryError, RegistryResult, ServerRegistry};
use crate::config::RetentionPolicy;
use crate::tool_registry::domain::{CallRecord, CallTotals, ServerId};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

/// Selects which retained records [`CallLedger::recent`] yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallWindow {
    /// Every retained record.
    All,
    /// At most this many of the newest records.
    Last(usize),
    /// Records no older than this.
    Since(Duration),
}

/// Snapshot of a server's recent calls, newest first.
///
/// The window is applied lazily on each iteration, and [`Self::iter`] can
/// be called any number of times.
#[derive(Debug, Clone)]
pub struct RecentCalls {
    records: Vec<CallRecord>,
    limit: Option<usize>,
    cutoff: Option<DateTime<Utc>>,
}

impl RecentCalls {
    /// Iterates the records inside the window, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &CallRecord> + '_ {
        self.records
            .iter()
            .filter(|record| self.cutoff.is_none_or(|cutoff| record.timestamp() >= cutoff))
            .take(self.limit.unwrap_or(usize::MAX))
    }
}

#[derive(Debug, Default)]
struct ServerLedger {
    records: VecDeque<CallRecord>,
    totals: CallTotals,
    tool_usage: HashMap<String, u64>,
}

impl ServerLedger {
    fn evict(&mut self, retention: &RetentionPolicy, now: DateTime<Utc>) {
        if let Some(max_records) = retention.max_records_per_server() {
            while self.records.len() > max_records {
                self.records.pop_front();
            }
        }

        if let Some(cutoff) = retention.max_age().and_then(|age| age_cutoff(now, age)) {
            while self
                .records
                .front()
                .is_some_and(|record| record.timestamp() < cutoff)
            {
                self.records.pop_front();
            }
        }
    }
}

type LedgerCell = Arc<Mutex<ServerLedger>>;

/// Bounded per-server call history plus cumulative counters.
///
/// Retained records are evicted oldest-first once either retention bound is
/// exceeded. Totals and per-tool usage counters are never evicted.
#[derive(Debug)]
pub struct CallLedger {
    registry: Arc<ServerRegistry>,
    retention: RetentionPolicy,
    entries: RwLock<HashMap<ServerId, LedgerCell>>,
}

impl CallLedger {
    /// Creates an empty ledger for the servers of `registry`.
    #[must_use]
    pub fn new(registry: Arc<ServerRegistry>, retention: RetentionPolicy) -> Self {
        Self {
            registry,
            retention,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the retention policy in force.
    #[must_use]
    pub const fn retention(&self) -> &RetentionPolicy {
        &self.retention
    }

    fn ensure_registered(&self, server_id: &ServerId) -> RegistryResult<()> {
        if self.registry.contains(server_id)? {
            return Ok(());
        }
        Err(RegistryError::NotFound(server_id.clone()))
    }

    fn existing_cell(&self, server_id: &ServerId) -> RegistryResult<Option<LedgerCell>> {
        let entries = self.entries.read().map_err(RegistryError::poisoned)?;
        Ok(entries.get(server_id).cloned())
    }

    fn cell(&self, server_id: &ServerId) -> RegistryResult<LedgerCell> {
        if let Some(cell) = self.existing_cell(server_id)? {
            return Ok(cell);
        }
        let mut entries = self.entries.write().map_err(RegistryError::poisoned)?;
        Ok(entries.entry(server_id.clone()).or_default().clone())
    }

    /// Appends a record for a registered server.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the record's server is not
    /// registered.
    pub fn append(&self, record: CallRecord, clock: &impl Clock) -> RegistryResult<()> {
        self.ensure_registered(record.server_id())?;
        let cell = self.cell(record.server_id())?;
        let mut ledger = cell.lock().map_err(RegistryError::poisoned)?;

        ledger.totals.record(&record);
        let usage = ledger
            .tool_usage
            .entry(record.tool_name().to_owned())
            .or_default();
        *usage = usage.saturating_add(1);
        ledger.records.push_back(record);
        ledger.evict(&self.retention, clock.utc());
        Ok(())
    }

    /// Returns the retained records of a server inside `window`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the server is not
    /// registered.
    pub fn recent(
        &self,
        server_id: &ServerId,
        window: CallWindow,
        clock: &impl Clock,
    ) -> RegistryResult<RecentCalls> {
        self.ensure_registered(server_id)?;
        let now = clock.utc();
        let records = match self.existing_cell(server_id)? {
            Some(cell) => {
                let mut ledger = cell.lock().map_err(RegistryError::poisoned)?;
                ledger.evict(&self.retention, now);
                ledger.records.iter().rev().cloned().collect()
            }
            None => Vec::new(),
        };

        let (limit, cutoff) = match window {
            CallWindow::All => (None, None),
            CallWindow::Last(count) => (Some(count), None),
            CallWindow::Since(age) => (None, age_cutoff(now, age)),
        };
        Ok(RecentCalls {
            records,
            limit,
            cutoff,
        })
    }

    /// Returns the cumulative counters of a server.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the server is not
    /// registered.
    pub fn totals(&self, server_id: &ServerId) -> RegistryResult<CallTotals> {
        self.ensure_registered(server_id)?;
        let Some(cell) = self.existing_cell(server_id)? else {
            return Ok(CallTotals::default());
        };
        let totals = cell.lock().map_err(RegistryError::poisoned)?.totals;
        Ok(totals)
    }

    /// Returns how often each tool of a server has been invoked.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the server is not
    /// registered.
    pub fn tool_usage(&self, server_id: &ServerId) -> RegistryResult<HashMap<String, u64>> {
        self.ensure_registered(server_id)?;
        let Some(cell) = self.existing_cell(server_id)? else {
            return Ok(HashMap::new());
        };
        let usage = cell
            .lock()
            .map_err(RegistryError::poisoned)?
            .tool_usage
            .clone();
        Ok(usage)
    }
}

fn age_cutoff(now: DateTime<Utc>, age: Duration) -> Option<DateTime<Utc>> {
    TimeDelta::from_std(age)
        .ok()
        .and_then(|delta| now.checked_sub_signed(delta))
}
