//! Live connection state of a registered server.

use super::{IllegalTransition, ParseConnectionStatusError, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection status of a server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Not connected. Initial state.
    #[default]
    Inactive,
    /// Handshake in progress.
    Connecting,
    /// Connected with a bound session.
    Active,
    /// Last handshake or health check failed.
    Error,
}

impl ConnectionStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Connecting => "connecting",
            Self::Active => "active",
            Self::Error => "error",
        }
    }

    /// Returns whether transition to `target` is an edge of the state machine.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Inactive | Self::Error, Self::Connecting)
                | (Self::Connecting, Self::Active | Self::Error)
                | (Self::Active, Self::Inactive | Self::Error)
                | (Self::Error, Self::Inactive)
        )
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ConnectionStatus {
    type Error = ParseConnectionStatusError;

    fn try_from(value: &str) -> Result<Self, ParseConnectionStatusError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "inactive" => Ok(Self::Inactive),
            "connecting" => Ok(Self::Connecting),
            "active" => Ok(Self::Active),
            "error" => Ok(Self::Error),
            _ => Err(ParseConnectionStatusError(value.to_owned())),
        }
    }
}

/// A requested state change, carrying the data the target state needs.
///
/// Entering `active` requires a session, and entering `error` records its
/// cause, so the session invariant cannot be broken by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTransition {
    /// Begin a handshake.
    Connecting,
    /// Handshake succeeded; bind the session.
    Active(SessionId),
    /// Handshake or health check failed with the given cause.
    Error(String),
    /// Disconnect or manual recovery.
    Inactive,
}

impl ConnectionTransition {
    /// Returns the status this transition leads to.
    #[must_use]
    pub const fn target(&self) -> ConnectionStatus {
        match self {
            Self::Connecting => ConnectionStatus::Connecting,
            Self::Active(_) => ConnectionStatus::Active,
            Self::Error(_) => ConnectionStatus::Error,
            Self::Inactive => ConnectionStatus::Inactive,
        }
    }
}

/// Live state of one server connection.
///
/// `session_id` is present if and only if `status` is
/// [`ConnectionStatus::Active`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    status: ConnectionStatus,
    last_health_check: Option<DateTime<Utc>>,
    session_id: Option<SessionId>,
    last_error: Option<String>,
}

impl ConnectionState {
    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Returns when the server was last confirmed healthy.
    #[must_use]
    pub const fn last_health_check(&self) -> Option<DateTime<Utc>> {
        self.last_health_check
    }

    /// Returns the bound session while active.
    #[must_use]
    pub const fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    /// Returns the cause recorded by the last failure, while in `error`.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Applies a transition, leaving the state untouched when the edge is
    /// not allowed.
    ///
    /// Entering `active` stamps `last_health_check` with `at`, since a
    /// completed handshake is a successful health check.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalTransition`] when the current status cannot move to
    /// the transition's target.
    pub fn apply(
        &mut self,
        transition: ConnectionTransition,
        at: DateTime<Utc>,
    ) -> Result<(), IllegalTransition> {
        let target = transition.target();
        if !self.status.can_transition_to(target) {
            return Err(IllegalTransition {
                from: self.status,
                to: target,
            });
        }

        match transition {
            ConnectionTransition::Active(session_id) => {
                self.session_id = Some(session_id);
                self.last_health_check = Some(at);
                self.last_error = None;
            }
            ConnectionTransition::Error(cause) => {
                self.session_id = None;
                self.last_error = Some(cause);
            }
            ConnectionTransition::Connecting | ConnectionTransition::Inactive => {
                self.session_id = None;
                self.last_error = None;
            }
        }
        self.status = target;
        Ok(())
    }

    /// Records a successful health check.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalTransition`] (`from` equal to `to`) when the server
    /// is not active; only active servers can be health-checked.
    pub fn record_health_check(&mut self, at: DateTime<Utc>) -> Result<(), IllegalTransition> {
        if self.status != ConnectionStatus::Active {
            return Err(IllegalTransition {
                from: self.status,
                to: ConnectionStatus::Active,
            });
        }
        self.last_health_check = Some(at);
        Ok(())
    }
}
