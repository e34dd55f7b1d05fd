//! Service layer for MCP server lifecycle orchestration.
//!
//! [`LifecycleController`] drives the connection state machine through the
//! external [`ServerConnector`]. Every piece of work that changes state runs
//! on a spawned task, so a caller that stops waiting (for example an aborted
//! HTTP request) never leaves a server stuck in `connecting`.

use crate::config::RegistryConfig;
use crate::tool_registry::{
    domain::{
        CallRecord, ConnectionState, ConnectionStatus, ConnectionTransition, LifecycleFailure,
        ServerDescriptor, ServerId, SessionId,
    },
    ports::{CredentialSource, Handshake, ServerConnector},
    state::{McpState, RegistryError},
};
use mockable::Clock;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, timeout};
use tracing::{debug, info, warn};

/// Lifecycle operations, as named in logs and outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// Bring a server up.
    Start,
    /// Take a server down.
    Stop,
    /// Session-oriented alias of [`Self::Start`].
    Connect,
    /// Session-oriented alias of [`Self::Stop`].
    Disconnect,
    /// Clear an `error` state.
    Reset,
    /// Probe an active server.
    HealthCheck,
}

impl LifecycleAction {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::Reset => "reset",
            Self::HealthCheck => "health_check",
        }
    }

    /// Returns whether the action takes a server down.
    #[must_use]
    pub const fn is_release(self) -> bool {
        matches!(self, Self::Stop | Self::Disconnect)
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Result of a lifecycle operation that reached the connector.
///
/// External failures are reported here with `success == false`; callers
/// must check the flag rather than rely on an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleOutcome {
    /// Server the operation targeted.
    pub server_id: ServerId,
    /// Operation performed.
    pub action: LifecycleAction,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Connection state after the operation.
    pub state: ConnectionState,
}

impl LifecycleOutcome {
    const fn succeeded(
        server_id: ServerId,
        action: LifecycleAction,
        message: String,
        state: ConnectionState,
    ) -> Self {
        Self {
            server_id,
            action,
            success: true,
            message,
            state,
        }
    }

    const fn failed(
        server_id: ServerId,
        action: LifecycleAction,
        message: String,
        state: ConnectionState,
    ) -> Self {
        Self {
            server_id,
            action,
            success: false,
            message,
            state,
        }
    }

    /// Returns the bound session, if the server is now active.
    #[must_use]
    pub const fn session_id(&self) -> Option<SessionId> {
        self.state.session_id()
    }
}

/// Result of a tool invocation. The call has been recorded in the ledger
/// whatever its outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallOutcome {
    /// Server the tool belongs to.
    pub server_id: ServerId,
    /// Invoked tool.
    pub tool_name: String,
    /// Whether the tool returned a result.
    pub success: bool,
    /// Measured latency in milliseconds.
    pub response_time_ms: u64,
    /// Tool output on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure message otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Service-level errors for lifecycle operations.
///
/// Connection failures and timeouts are not errors; see
/// [`LifecycleOutcome`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// Registry, tracker, or ledger rejected the operation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The operation requires an `active` server.
    #[error("MCP server {server_id} is {status}, not active")]
    NotActive {
        /// Target server.
        server_id: ServerId,
        /// Status observed.
        status: ConnectionStatus,
    },

    /// `reset` was requested for a server that is not in `error`.
    #[error("MCP server {server_id} is {status}; only servers in error can be reset")]
    NotInError {
        /// Target server.
        server_id: ServerId,
        /// Status observed.
        status: ConnectionStatus,
    },

    /// The tool is known but switched off.
    #[error("tool '{tool_name}' on MCP server {server_id} is disabled")]
    ToolDisabled {
        /// Target server.
        server_id: ServerId,
        /// Requested tool.
        tool_name: String,
    },

    /// Arguments omit parameters the tool requires.
    #[error("tool '{tool_name}' is missing required arguments: {}", .missing.join(", "))]
    MissingArguments {
        /// Requested tool.
        tool_name: String,
        /// Required parameter names absent from the arguments.
        missing: Vec<String>,
    },

    /// The spawned lifecycle task panicked or was cancelled by the runtime.
    #[error("lifecycle task for MCP server {server_id} did not complete: {reason}")]
    TaskAborted {
        /// Target server.
        server_id: ServerId,
        /// Join failure.
        reason: String,
    },
}

impl LifecycleError {
    /// Returns whether the error reports an unknown server.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Registry(RegistryError::NotFound(_)))
    }
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Drives servers through `inactive → connecting → active` and back.
pub struct LifecycleController<K, S, C>
where
    K: ServerConnector + 'static,
    S: CredentialSource + 'static,
    C: Clock + Send + Sync + 'static,
{
    state: McpState,
    connector: Arc<K>,
    credentials: Arc<S>,
    clock: Arc<C>,
    config: Arc<RegistryConfig>,
}

impl<K, S, C> Clone for LifecycleController<K, S, C>
where
    K: ServerConnector + 'static,
    S: CredentialSource + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            connector: Arc::clone(&self.connector),
            credentials: Arc::clone(&self.credentials),
            clock: Arc::clone(&self.clock),
            config: Arc::clone(&self.config),
        }
    }
}

impl<K, S, C> LifecycleController<K, S, C>
where
    K: ServerConnector + 'static,
    S: CredentialSource + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a controller over shared registry state.
    #[must_use]
    pub fn new(
        state: McpState,
        connector: Arc<K>,
        credentials: Arc<S>,
        clock: Arc<C>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            state,
            connector,
            credentials,
            clock,
            config: Arc::new(config),
        }
    }

    /// Returns the shared registry state.
    #[must_use]
    pub const fn state(&self) -> &McpState {
        &self.state
    }

    /// Returns the configuration in force.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Starts a server: `inactive|error → connecting → active|error`.
    ///
    /// A failed or timed-out handshake is reported as an unsuccessful
    /// outcome and leaves the server in `error`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for an unknown server and
    /// [`RegistryError::InvalidTransition`] when the server is already
    /// `connecting` or `active`.
    pub async fn start(&self, server_id: &ServerId) -> LifecycleResult<LifecycleOutcome> {
        self.bring_up(server_id, LifecycleAction::Start).await
    }

    /// Session-oriented alias of [`Self::start`]; the outcome carries the
    /// bound session.
    ///
    /// # Errors
    ///
    /// As for [`Self::start`].
    pub async fn connect(&self, server_id: &ServerId) -> LifecycleResult<LifecycleOutcome> {
        self.bring_up(server_id, LifecycleAction::Connect).await
    }

    /// Stops a server and releases its session.
    ///
    /// Stopping an `inactive` server succeeds without touching its state.
    /// Stopping a server in `error` clears the error.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for an unknown server and
    /// [`RegistryError::InvalidTransition`] while a handshake is in flight.
    pub async fn stop(&self, server_id: &ServerId) -> LifecycleResult<LifecycleOutcome> {
        self.bring_down(server_id, LifecycleAction::Stop).await
    }

    /// Session-oriented alias of [`Self::stop`].
    ///
    /// # Errors
    ///
    /// As for [`Self::stop`].
    pub async fn disconnect(&self, server_id: &ServerId) -> LifecycleResult<LifecycleOutcome> {
        self.bring_down(server_id, LifecycleAction::Disconnect).await
    }

    /// Clears an `error` state back to `inactive`. A no-op on `inactive`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for an unknown server and
    /// [`LifecycleError::NotInError`] while `connecting` or `active`.
    pub async fn reset(&self, server_id: &ServerId) -> LifecycleResult<LifecycleOutcome> {
        let descriptor = self.state.registry.get(server_id)?;
        let controller = self.clone();
        detached(server_id, async move { controller.run_reset(&descriptor) })
            .await
    }

    /// Probes an active server. A failed probe moves it to `error`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for an unknown server and
    /// [`LifecycleError::NotActive`] when it is not `active`.
    pub async fn check_health(&self, server_id: &ServerId) -> LifecycleResult<LifecycleOutcome> {
        let descriptor = self.state.registry.get(server_id)?;
        let controller = self.clone();
        detached(server_id, async move {
            controller.run_health_check(&descriptor).await
        })
        .await
    }

    /// Invokes a tool on an active server and records the call.
    ///
    /// Tool failures and timeouts are recorded and reported through
    /// [`ToolCallOutcome`]; they do not change the connection state.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`], [`RegistryError::UnknownTool`],
    /// [`LifecycleError::NotActive`], [`LifecycleError::ToolDisabled`] or
    /// [`LifecycleError::MissingArguments`] before anything is invoked.
    pub async fn call_tool(
        &self,
        server_id: &ServerId,
        tool_name: &str,
        arguments: Value,
    ) -> LifecycleResult<ToolCallOutcome> {
        let descriptor = self.state.registry.get(server_id)?;
        let current = self.state.tracker.get(server_id)?;
        let (ConnectionStatus::Active, Some(session_id)) = (current.status(), current.session_id())
        else {
            return Err(LifecycleError::NotActive {
                server_id: server_id.clone(),
                status: current.status(),
            });
        };

        let tool = self.state.registry.tool(server_id, tool_name)?;
        if !tool.enabled() {
            return Err(LifecycleError::ToolDisabled {
                server_id: server_id.clone(),
                tool_name: tool_name.to_owned(),
            });
        }
        let missing = tool.missing_arguments(&arguments);
        if !missing.is_empty() {
            return Err(LifecycleError::MissingArguments {
                tool_name: tool_name.to_owned(),
                missing: missing.into_iter().map(str::to_owned).collect(),
            });
        }

        let controller = self.clone();
        let owned_tool_name = tool_name.to_owned();
        detached(server_id, async move {
            controller
                .run_tool_call(&descriptor, session_id, owned_tool_name, arguments)
                .await
        })
        .await
    }

    async fn bring_up(
        &self,
        server_id: &ServerId,
        action: LifecycleAction,
    ) -> LifecycleResult<LifecycleOutcome> {
        let descriptor = self.state.registry.get(server_id).inspect_err(|err| {
            warn!(server_id = %server_id, action = %action, error = %err, "MCP lifecycle request rejected");
        })?;
        let controller = self.clone();
        detached(server_id, async move {
            controller.run_bring_up(&descriptor, action).await
        })
        .await
    }

    async fn run_bring_up(
        &self,
        descriptor: &ServerDescriptor,
        action: LifecycleAction,
    ) -> LifecycleResult<LifecycleOutcome> {
        let server_id = descriptor.id();
        self.state
            .tracker
            .transition(server_id, ConnectionTransition::Connecting, &*self.clock)
            .inspect_err(|err| {
                warn!(server_id = %server_id, action = %action, error = %err, "MCP lifecycle transition rejected");
            })?;
        debug!(server_id = %server_id, action = %action, "MCP server connecting");

        let session_id = SessionId::new();
        match self.handshake(descriptor, session_id).await {
            Ok(handshake) => {
                let tool_count = handshake.tools.len();
                let state = self
                    .state
                    .tracker
                    .bind_session(server_id, session_id, &*self.clock)?;
                self.state.registry.set_tools(server_id, handshake.tools)?;
                info!(
                    server_id = %server_id,
                    action = %action,
                    outcome = "success",
                    session_id = %session_id,
                    tools = tool_count,
                    latency_ms = handshake.latency.map_or(0, elapsed_millis),
                    "MCP server connected"
                );
                Ok(LifecycleOutcome::succeeded(
                    server_id.clone(),
                    action,
                    format!("Server {} {} successfully", descriptor.name(), past_tense(action)),
                    state,
                ))
            }
            Err(failure) => {
                let state = self.state.tracker.transition(
                    server_id,
                    ConnectionTransition::Error(failure.to_string()),
                    &*self.clock,
                )?;
                warn!(
                    server_id = %server_id,
                    action = %action,
                    outcome = "failure",
                    timeout = failure.is_timeout(),
                    error = %failure,
                    "MCP server connection failed"
                );
                Ok(LifecycleOutcome::failed(
                    server_id.clone(),
                    action,
                    format!("Failed to {action} server {}: {failure}", descriptor.name()),
                    state,
                ))
            }
        }
    }

    async fn handshake(
        &self,
        descriptor: &ServerDescriptor,
        session_id: SessionId,
    ) -> Result<Handshake, LifecycleFailure> {
        let api_key = self.resolve_api_key(descriptor)?;
        let limit = self.config.connect_timeout();
        let started = Instant::now();
        match timeout(limit, self.connector.connect(descriptor, session_id, api_key)).await {
            Ok(Ok(handshake)) => Ok(Handshake {
                latency: handshake.latency.or_else(|| Some(started.elapsed())),
                ..handshake
            }),
            Ok(Err(err)) => Err(LifecycleFailure::connection(err)),
            Err(_) => Err(LifecycleFailure::Timeout(limit)),
        }
    }

    fn resolve_api_key(
        &self,
        descriptor: &ServerDescriptor,
    ) -> Result<Option<String>, LifecycleFailure> {
        if !descriptor.requires_api_key() {
            return Ok(None);
        }
        let Some(key_name) = descriptor.api_key_name() else {
            return Err(LifecycleFailure::connection("no API key name configured"));
        };
        self.credentials
            .api_key(key_name)
            .map(Some)
            .ok_or_else(|| LifecycleFailure::connection(format!("API key {key_name} is not set")))
    }

    async fn bring_down(
        &self,
        server_id: &ServerId,
        action: LifecycleAction,
    ) -> LifecycleResult<LifecycleOutcome> {
        let descriptor = self.state.registry.get(server_id).inspect_err(|err| {
            warn!(server_id = %server_id, action = %action, error = %err, "MCP lifecycle request rejected");
        })?;
        let controller = self.clone();
        detached(server_id, async move {
            controller.run_bring_down(&descriptor, action).await
        })
        .await
    }

    async fn run_bring_down(
        &self,
        descriptor: &ServerDescriptor,
        action: LifecycleAction,
    ) -> LifecycleResult<LifecycleOutcome> {
        let server_id = descriptor.id();
        let current = self.state.tracker.get(server_id)?;
        if current.status() == ConnectionStatus::Inactive {
            return Ok(already_inactive(descriptor, action, current));
        }

        let settled = if let (ConnectionStatus::Active, Some(session_id)) =
            (current.status(), current.session_id())
        {
            self.release(descriptor, session_id, action).await;
            match self.state.tracker.transition_if_session(
                server_id,
                session_id,
                ConnectionTransition::Inactive,
                &*self.clock,
            ) {
                Ok(Some(state)) => Ok(state),
                Ok(None) => return self.superseded(descriptor, action, session_id),
                Err(err) => Err(err),
            }
        } else {
            self.state
                .tracker
                .transition(server_id, ConnectionTransition::Inactive, &*self.clock)
        };

        match settled {
            Ok(state) => {
                info!(server_id = %server_id, action = %action, outcome = "success", "MCP server stopped");
                Ok(LifecycleOutcome::succeeded(
                    server_id.clone(),
                    action,
                    format!("Server {} {} successfully", descriptor.name(), past_tense(action)),
                    state,
                ))
            }
            Err(RegistryError::InvalidTransition {
                from: ConnectionStatus::Inactive,
                ..
            }) => {
                let state = self.state.tracker.get(server_id)?;
                Ok(already_inactive(descriptor, action, state))
            }
            Err(err) => {
                warn!(server_id = %server_id, action = %action, error = %err, "MCP lifecycle transition rejected");
                Err(err.into())
            }
        }
    }

    /// Reports an action whose session was released or replaced while the
    /// connector call was in flight. The current state is left as is.
    fn superseded(
        &self,
        descriptor: &ServerDescriptor,
        action: LifecycleAction,
        session_id: SessionId,
    ) -> LifecycleResult<LifecycleOutcome> {
        let server_id = descriptor.id();
        let current = self.state.tracker.get(server_id)?;
        if action.is_release() && current.status() == ConnectionStatus::Inactive {
            return Ok(already_inactive(descriptor, action, current));
        }
        info!(
            server_id = %server_id,
            action = %action,
            session_id = %session_id,
            status = %current.status(),
            outcome = "superseded",
            "MCP session changed during lifecycle action"
        );
        Ok(LifecycleOutcome::failed(
            server_id.clone(),
            action,
            format!(
                "Server {} session changed during {action}; current state left unchanged",
                descriptor.name()
            ),
            current,
        ))
    }

    async fn release(
        &self,
        descriptor: &ServerDescriptor,
        session_id: SessionId,
        action: LifecycleAction,
    ) {
        let limit = self.config.disconnect_timeout();
        let failure = match timeout(limit, self.connector.disconnect(descriptor, session_id)).await
        {
            Ok(Ok(())) => return,
            Ok(Err(err)) => LifecycleFailure::connection(err),
            Err(_) => LifecycleFailure::Timeout(limit),
        };
        warn!(
            server_id = %descriptor.id(),
            action = %action,
            session_id = %session_id,
            error = %failure,
            "MCP server did not release its session cleanly"
        );
    }

    fn run_reset(&self, descriptor: &ServerDescriptor) -> LifecycleResult<LifecycleOutcome> {
        let server_id = descriptor.id();
        let action = LifecycleAction::Reset;
        let current = self.state.tracker.get(server_id)?;
        match current.status() {
            ConnectionStatus::Inactive => Ok(already_inactive(descriptor, action, current)),
            ConnectionStatus::Error => {
                let state = self.state.tracker.transition(
                    server_id,
                    ConnectionTransition::Inactive,
                    &*self.clock,
                )?;
                info!(server_id = %server_id, action = %action, outcome = "success", "MCP server error cleared");
                Ok(LifecycleOutcome::succeeded(
                    server_id.clone(),
                    action,
                    format!("Server {} reset", descriptor.name()),
                    state,
                ))
            }
            status => {
                warn!(server_id = %server_id, action = %action, status = %status, "MCP server reset rejected");
                Err(LifecycleError::NotInError {
                    server_id: server_id.clone(),
                    status,
                })
            }
        }
    }

    async fn run_health_check(
        &self,
        descriptor: &ServerDescriptor,
    ) -> LifecycleResult<LifecycleOutcome> {
        let server_id = descriptor.id();
        let action = LifecycleAction::HealthCheck;
        let current = self.state.tracker.get(server_id)?;
        let (ConnectionStatus::Active, Some(session_id)) = (current.status(), current.session_id())
        else {
            return Err(LifecycleError::NotActive {
                server_id: server_id.clone(),
                status: current.status(),
            });
        };

        let limit = self.config.health_check_timeout();
        let failure = match timeout(limit, self.connector.health_check(descriptor, session_id)).await
        {
            Ok(Ok(())) => {
                let Some(state) = self.state.tracker.record_health_check_if_session(
                    server_id,
                    session_id,
                    &*self.clock,
                )?
                else {
                    return self.superseded(descriptor, action, session_id);
                };
                debug!(server_id = %server_id, action = %action, outcome = "success", "MCP server healthy");
                return Ok(LifecycleOutcome::succeeded(
                    server_id.clone(),
                    action,
                    format!("Server {} is healthy", descriptor.name()),
                    state,
                ));
            }
            Ok(Err(err)) => LifecycleFailure::connection(err),
            Err(_) => LifecycleFailure::Timeout(limit),
        };

        let Some(state) = self.state.tracker.transition_if_session(
            server_id,
            session_id,
            ConnectionTransition::Error(failure.to_string()),
            &*self.clock,
        )?
        else {
            return self.superseded(descriptor, action, session_id);
        };
        warn!(
            server_id = %server_id,
            action = %action,
            outcome = "failure",
            timeout = failure.is_timeout(),
            error = %failure,
            "MCP server health check failed"
        );
        Ok(LifecycleOutcome::failed(
            server_id.clone(),
            action,
            format!("Server {} is unhealthy: {failure}", descriptor.name()),
            state,
        ))
    }

    async fn run_tool_call(
        &self,
        descriptor: &ServerDescriptor,
        session_id: SessionId,
        tool_name: String,
        arguments: Value,
    ) -> LifecycleResult<ToolCallOutcome> {
        let server_id = descriptor.id();
        let limit = self.config.tool_call_timeout();
        let started = Instant::now();
        let result = match timeout(
            limit,
            self.connector
                .call_tool(descriptor, session_id, &tool_name, arguments),
        )
        .await
        {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(LifecycleFailure::Timeout(limit).to_string()),
        };
        let response_time_ms = elapsed_millis(started.elapsed());
        let timestamp = self.clock.utc();

        let record = match &result {
            Ok(_) => CallRecord::succeeded(server_id.clone(), &tool_name, timestamp, response_time_ms),
            Err(message) => CallRecord::failed(
                server_id.clone(),
                &tool_name,
                timestamp,
                response_time_ms,
                message.clone(),
            ),
        };
        self.state.ledger.append(record, &*self.clock)?;

        match result {
            Ok(value) => {
                debug!(server_id = %server_id, tool = %tool_name, latency_ms = response_time_ms, "MCP tool call succeeded");
                Ok(ToolCallOutcome {
                    server_id: server_id.clone(),
                    tool_name,
                    success: true,
                    response_time_ms,
                    result: Some(value),
                    error: None,
                })
            }
            Err(message) => {
                warn!(server_id = %server_id, tool = %tool_name, latency_ms = response_time_ms, error = %message, "MCP tool call failed");
                Ok(ToolCallOutcome {
                    server_id: server_id.clone(),
                    tool_name,
                    success: false,
                    response_time_ms,
                    result: None,
                    error: Some(message),
                })
            }
        }
    }
}

/// Runs `work` on its own task so it completes even if the caller stops
/// waiting.
async fn detached<T, F>(server_id: &ServerId, work: F) -> LifecycleResult<T>
where
    T: Send + 'static,
    F: Future<Output = LifecycleResult<T>> + Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|err| LifecycleError::TaskAborted {
            server_id: server_id.clone(),
            reason: err.to_string(),
        })?
}

fn already_inactive(
    descriptor: &ServerDescriptor,
    action: LifecycleAction,
    state: ConnectionState,
) -> LifecycleOutcome {
    debug!(server_id = %descriptor.id(), action = %action, outcome = "noop", "MCP server already inactive");
    LifecycleOutcome::succeeded(
        descriptor.id().clone(),
        action,
        format!("Server {} is already stopped", descriptor.name()),
        state,
    )
}

const fn past_tense(action: LifecycleAction) -> &'static str {
    match action {
        LifecycleAction::Start => "started",
        LifecycleAction::Stop => "stopped",
        LifecycleAction::Connect => "connected",
        LifecycleAction::Disconnect => "disconnected",
        LifecycleAction::Reset => "reset",
        LifecycleAction::HealthCheck => "checked",
    }
}

fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
