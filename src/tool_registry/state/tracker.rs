//! Per-server live connection state.

use super::{RegistryError, RegistryResult};
use crate::tool_registry::domain::{
    ConnectionState, ConnectionTransition, IllegalTransition, ServerId, SessionId,
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

type StateCell = Arc<Mutex<ConnectionState>>;

/// Tracks the connection state of every server.
///
/// Entries are created lazily in `inactive` and are never removed. Each
/// entry has its own mutex, so a transition is an atomic check-then-set for
/// that server only.
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    entries: RwLock<HashMap<ServerId, StateCell>>,
}

impl ConnectionTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn existing_cell(&self, server_id: &ServerId) -> RegistryResult<Option<StateCell>> {
        let entries = self.entries.read().map_err(RegistryError::poisoned)?;
        Ok(entries.get(server_id).cloned())
    }

    fn cell(&self, server_id: &ServerId) -> RegistryResult<StateCell> {
        if let Some(cell) = self.existing_cell(server_id)? {
            return Ok(cell);
        }

        let mut entries = self.entries.write().map_err(RegistryError::poisoned)?;
        Ok(entries.entry(server_id.clone()).or_default().clone())
    }

    /// Returns the current state, `inactive` when never touched.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when a tracker lock is
    /// poisoned.
    pub fn get(&self, server_id: &ServerId) -> RegistryResult<ConnectionState> {
        let Some(cell) = self.existing_cell(server_id)? else {
            return Ok(ConnectionState::default());
        };
        let state = cell.lock().map_err(RegistryError::poisoned)?;
        Ok(state.clone())
    }

    /// Applies a transition and returns the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidTransition`] without mutating state
    /// when the edge is not allowed.
    pub fn transition(
        &self,
        server_id: &ServerId,
        transition: ConnectionTransition,
        clock: &impl Clock,
    ) -> RegistryResult<ConnectionState> {
        let cell = self.cell(server_id)?;
        let mut state = cell.lock().map_err(RegistryError::poisoned)?;
        state
            .apply(transition, clock.utc())
            .map_err(|err| invalid_transition(server_id, err))?;
        Ok(state.clone())
    }

    /// Completes a handshake by moving `connecting → active` with a session.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidTransition`] when the server is not
    /// `connecting`.
    pub fn bind_session(
        &self,
        server_id: &ServerId,
        session_id: SessionId,
        clock: &impl Clock,
    ) -> RegistryResult<ConnectionState> {
        self.transition(server_id, ConnectionTransition::Active(session_id), clock)
    }

    /// Stamps a successful health check on an active server.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidTransition`] when the server is not
    /// `active`.
    pub fn record_health_check(
        &self,
        server_id: &ServerId,
        clock: &impl Clock,
    ) -> RegistryResult<ConnectionState> {
        let cell = self.cell(server_id)?;
        let mut state = cell.lock().map_err(RegistryError::poisoned)?;
        state
            .record_health_check(clock.utc())
            .map_err(|err| invalid_transition(server_id, err))?;
        Ok(state.clone())
    }

    /// Applies a transition only while `expected` is still the bound
    /// session.
    ///
    /// Returns `Ok(None)` without mutating state when the session has been
    /// released or replaced since the caller observed it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidTransition`] when the session matches
    /// but the edge is not allowed.
    pub fn transition_if_session(
        &self,
        server_id: &ServerId,
        expected: SessionId,
        transition: ConnectionTransition,
        clock: &impl Clock,
    ) -> RegistryResult<Option<ConnectionState>> {
        self.update_if_session(server_id, expected, |state| {
            state.apply(transition, clock.utc())
        })
    }

    /// Stamps a successful health check only while `expected` is still the
    /// bound session. Returns `Ok(None)` for a superseded session.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when a tracker lock is
    /// poisoned.
    pub fn record_health_check_if_session(
        &self,
        server_id: &ServerId,
        expected: SessionId,
        clock: &impl Clock,
    ) -> RegistryResult<Option<ConnectionState>> {
        self.update_if_session(server_id, expected, |state| {
            state.record_health_check(clock.utc())
        })
    }

    fn update_if_session(
        &self,
        server_id: &ServerId,
        expected: SessionId,
        change: impl FnOnce(&mut ConnectionState) -> Result<(), IllegalTransition>,
    ) -> RegistryResult<Option<ConnectionState>> {
        let Some(cell) = self.existing_cell(server_id)? else {
            return Ok(None);
        };
        let mut state = cell.lock().map_err(RegistryError::poisoned)?;
        if state.session_id() != Some(expected) {
            return Ok(None);
        }
        change(&mut state).map_err(|err| invalid_transition(server_id, err))?;
        Ok(Some(state.clone()))
    }

    /// Returns a copy of every tracked state.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when a tracker lock is
    /// poisoned.
    pub fn snapshot(&self) -> RegistryResult<HashMap<ServerId, ConnectionState>> {
        let cells: Vec<(ServerId, StateCell)> = {
            let entries = self.entries.read().map_err(RegistryError::poisoned)?;
            entries
                .iter()
                .map(|(server_id, cell)| (server_id.clone(), Arc::clone(cell)))
                .collect()
        };

        cells
            .into_iter()
            .map(|(server_id, cell)| {
                let state = cell.lock().map_err(RegistryError::poisoned)?.clone();
                Ok((server_id, state))
            })
            .collect()
    }
}

fn invalid_transition(server_id: &ServerId, err: IllegalTransition) -> RegistryError {
    RegistryError::InvalidTransition {
        server_id: server_id.clone(),
        from: err.from,
        to: err.to,
    }
}
