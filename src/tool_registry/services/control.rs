//! Request and response shapes for the registry's external surface.
//!
//! [`ControlPlane`] is what an HTTP layer would call. It accepts raw string
//! identifiers and actions, surfaces unknown servers and unknown actions as
//! errors, and reports every other lifecycle rejection as
//! `{ success: false, message }`.

use super::{LifecycleController, LifecycleError, LifecycleOutcome, StatsAggregator};
use crate::tool_registry::{
    domain::{
        ConnectionStatus, ServerDescriptor, ServerId, ServerStats, SessionId, ToolDescriptor,
    },
    ports::{CredentialSource, ServerConnector},
    state::{RegistryError, RegistryResult},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Action accepted by [`ControlPlane::control`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    /// Bring the server up.
    Start,
    /// Take the server down.
    Stop,
}

impl ControlAction {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ControlAction {
    type Error = ControlError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            _ => Err(ControlError::InvalidAction(value.to_owned())),
        }
    }
}

/// Body of a control request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequest {
    /// Target server.
    pub server_id: String,
    /// `start` or `stop`.
    pub action: String,
}

impl ControlRequest {
    /// Creates a control request.
    #[must_use]
    pub fn new(server_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            server_id: server_id.into(),
            action: action.into(),
        }
    }
}

/// Reply to a control request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlResponse {
    /// Whether the action succeeded.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Target server.
    pub server_id: String,
}

/// Reply to a connect or disconnect request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Session bound by a successful connect.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_id: Option<SessionId>,
}

/// Tool entry of a [`ServerView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSummary {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// Whether the tool may be invoked.
    pub enabled: bool,
    /// Calls ever made to the tool.
    pub usage_count: u64,
}

impl From<&ToolDescriptor> for ToolSummary {
    fn from(tool: &ToolDescriptor) -> Self {
        Self {
            name: tool.name().to_owned(),
            description: tool.description().to_owned(),
            enabled: tool.enabled(),
            usage_count: tool.usage_count(),
        }
    }
}

/// One entry of the server listing: descriptor, live state, and tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerView {
    /// Registered metadata.
    #[serde(flatten)]
    pub descriptor: ServerDescriptor,
    /// Connection status.
    pub status: ConnectionStatus,
    /// Last successful health check.
    pub last_health_check: Option<DateTime<Utc>>,
    /// Bound session while active.
    pub session_id: Option<SessionId>,
    /// Cause of the last failure while in error.
    pub last_error: Option<String>,
    /// Advertised tools with usage counters.
    pub tools: Vec<ToolSummary>,
}

/// Errors surfaced directly to the caller of the external surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControlError {
    /// The action is neither `start` nor `stop`.
    #[error("invalid action '{0}', expected 'start' or 'stop'")]
    InvalidAction(String),

    /// No server is registered under the identifier.
    #[error("MCP server {0} not found")]
    NotFound(String),

    /// Any other lifecycle failure.
    #[error(transparent)]
    Lifecycle(LifecycleError),
}

impl ControlError {
    /// Returns the HTTP status code a web layer should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAction(_) => 400,
            Self::NotFound(_) => 404,
            Self::Lifecycle(
                LifecycleError::Registry(RegistryError::InvalidTransition { .. })
                | LifecycleError::NotActive { .. }
                | LifecycleError::NotInError { .. },
            ) => 409,
            Self::Lifecycle(_) => 500,
        }
    }
}

impl From<LifecycleError> for ControlError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Registry(RegistryError::NotFound(server_id)) => {
                Self::NotFound(server_id.to_string())
            }
            other => Self::Lifecycle(other),
        }
    }
}

impl From<RegistryError> for ControlError {
    fn from(err: RegistryError) -> Self {
        LifecycleError::Registry(err).into()
    }
}

/// Result type for control-plane operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Entry points for an external caller such as an API route.
pub struct ControlPlane<K, S, C>
where
    K: ServerConnector + 'static,
    S: CredentialSource + 'static,
    C: Clock + Send + Sync + 'static,
{
    lifecycle: LifecycleController<K, S, C>,
    stats: StatsAggregator,
}

impl<K, S, C> Clone for ControlPlane<K, S, C>
where
    K: ServerConnector + 'static,
    S: CredentialSource + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            lifecycle: self.lifecycle.clone(),
            stats: self.stats.clone(),
        }
    }
}

impl<K, S, C> ControlPlane<K, S, C>
where
    K: ServerConnector + 'static,
    S: CredentialSource + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a control plane over a lifecycle controller. Statistics read
    /// the controller's state.
    #[must_use]
    pub fn new(lifecycle: LifecycleController<K, S, C>) -> Self {
        let stats = StatsAggregator::new(lifecycle.state().clone());
        Self { lifecycle, stats }
    }

    /// Returns the underlying lifecycle controller.
    #[must_use]
    pub const fn lifecycle(&self) -> &LifecycleController<K, S, C> {
        &self.lifecycle
    }

    /// Starts or stops a server.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidAction`] for an unknown action and
    /// [`ControlError::NotFound`] for an unknown server. Rejected
    /// transitions are reported as unsuccessful responses instead.
    pub async fn control(&self, request: &ControlRequest) -> ControlResult<ControlResponse> {
        let action = ControlAction::try_from(request.action.as_str())?;
        let server_id = parse_server_id(&request.server_id)?;

        let result = match action {
            ControlAction::Start => self.lifecycle.start(&server_id).await,
            ControlAction::Stop => self.lifecycle.stop(&server_id).await,
        };
        let (success, message) = settle(result)?;
        Ok(ControlResponse {
            success,
            message,
            server_id: server_id.to_string(),
        })
    }

    /// Connects a server and binds a session.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::NotFound`] for an unknown server.
    pub async fn connect(&self, server_id: &str) -> ControlResult<ConnectResponse> {
        let parsed = parse_server_id(server_id)?;
        let result = self.lifecycle.connect(&parsed).await;
        let session_id = result.as_ref().ok().and_then(LifecycleOutcome::session_id);
        let (success, message) = settle(result)?;
        Ok(ConnectResponse {
            success,
            message,
            session_id,
        })
    }

    /// Disconnects a server and releases its session.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::NotFound`] for an unknown server.
    pub async fn disconnect(&self, server_id: &str) -> ControlResult<ConnectResponse> {
        let parsed = parse_server_id(server_id)?;
        let (success, message) = settle(self.lifecycle.disconnect(&parsed).await)?;
        Ok(ConnectResponse {
            success,
            message,
            session_id: None,
        })
    }

    /// Lists every server with its live state and tool usage.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Lifecycle`] when a component lock is
    /// poisoned.
    pub fn list_servers(&self) -> ControlResult<Vec<ServerView>> {
        let state = self.lifecycle.state();
        let views = state
            .registry
            .list()?
            .into_iter()
            .map(|descriptor| {
                let connection = state.tracker.get(descriptor.id())?;
                let usage = state.ledger.tool_usage(descriptor.id())?;
                let tools = state
                    .registry
                    .tools(descriptor.id())?
                    .into_iter()
                    .map(|tool| {
                        let count = usage.get(tool.name()).copied().unwrap_or_default();
                        ToolSummary::from(&tool.with_usage_count(count))
                    })
                    .collect();
                Ok(ServerView {
                    status: connection.status(),
                    last_health_check: connection.last_health_check(),
                    session_id: connection.session_id(),
                    last_error: connection.last_error().map(str::to_owned),
                    tools,
                    descriptor,
                })
            })
            .collect::<RegistryResult<Vec<_>>>()?;
        Ok(views)
    }

    /// Returns the fleet summary.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Lifecycle`] when a component lock is
    /// poisoned.
    pub fn stats(&self) -> ControlResult<ServerStats> {
        Ok(self.stats.compute_server_stats()?)
    }
}

fn parse_server_id(raw: &str) -> ControlResult<ServerId> {
    ServerId::new(raw).map_err(|_| ControlError::NotFound(raw.trim().to_owned()))
}

/// Folds a lifecycle result into `(success, message)`, keeping only the
/// errors the caller must see as request failures.
fn settle(result: Result<LifecycleOutcome, LifecycleError>) -> ControlResult<(bool, String)> {
    match result {
        Ok(outcome) => Ok((outcome.success, outcome.message)),
        Err(err @ LifecycleError::Registry(RegistryError::InvalidTransition { .. })) => {
            Ok((false, err.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("start", ControlAction::Start)]
    #[case(" STOP ", ControlAction::Stop)]
    #[case("Start", ControlAction::Start)]
    fn actions_parse_case_insensitively(#[case] raw: &str, #[case] expected: ControlAction) {
        assert_eq!(ControlAction::try_from(raw), Ok(expected));
    }

    #[rstest]
    #[case("restart")]
    #[case("")]
    fn unknown_actions_are_rejected(#[case] raw: &str) {
        let err = ControlAction::try_from(raw).expect_err("action should be rejected");

        assert_eq!(err, ControlError::InvalidAction(raw.to_owned()));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn not_found_is_lifted_out_of_lifecycle_errors() {
        let server_id = ServerId::new("unknown-id").expect("valid id");

        let err = ControlError::from(LifecycleError::Registry(RegistryError::NotFound(server_id)));

        assert_eq!(err, ControlError::NotFound("unknown-id".to_owned()));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn rejected_transition_settles_as_unsuccessful() {
        let server_id = ServerId::new("postgres").expect("valid id");
        let rejected = Err(LifecycleError::Registry(RegistryError::InvalidTransition {
            server_id,
            from: ConnectionStatus::Active,
            to: ConnectionStatus::Connecting,
        }));

        let (success, message) = settle(rejected).expect("transition errors settle");

        assert!(!success);
        assert!(message.contains("postgres"));
    }
}
