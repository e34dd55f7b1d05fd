//! In-memory connector adapter for lifecycle tests and local flows.

use crate::tool_registry::{
    domain::{ServerDescriptor, ServerId, SessionId, ToolDescriptor},
    ports::{ConnectorError, ConnectorResult, Handshake, ServerConnector},
};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// In-memory MCP server connector.
///
/// This adapter models handshakes, probes and tool calls without any
/// network traffic. Failures and latency are scripted per server, which
/// makes it suitable for unit and integration tests and for deterministic
/// local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServerConnector {
    state: Arc<RwLock<InMemoryConnectorState>>,
}

#[derive(Debug, Default)]
struct InMemoryConnectorState {
    sessions: HashMap<ServerId, SessionId>,
    connect_attempts: HashMap<ServerId, u64>,
    connect_failures: HashMap<ServerId, String>,
    connect_delays: HashMap<ServerId, Duration>,
    health_check_delays: HashMap<ServerId, Duration>,
    disconnect_delays: HashMap<ServerId, Duration>,
    unhealthy_servers: HashMap<ServerId, String>,
    tool_catalogs: HashMap<ServerId, Vec<ToolDescriptor>>,
    tool_results: HashMap<(ServerId, String), Result<Value, String>>,
}

impl InMemoryServerConnector {
    /// Creates a connector where every handshake succeeds immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ConnectorResult<RwLockReadGuard<'_, InMemoryConnectorState>> {
        self.state
            .read()
            .map_err(|err| ConnectorError::runtime(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> ConnectorResult<RwLockWriteGuard<'_, InMemoryConnectorState>> {
        self.state
            .write()
            .map_err(|err| ConnectorError::runtime(std::io::Error::other(err.to_string())))
    }

    /// Associates the advertised tool catalogue with a server.
    ///
    /// Existing catalogue entries are replaced.
    ///
    /// # Errors
    ///
    /// Returns connector runtime errors when lock acquisition fails.
    pub fn set_tool_catalog(
        &self,
        server_id: ServerId,
        tools: Vec<ToolDescriptor>,
    ) -> ConnectorResult<()> {
        self.write()?.tool_catalogs.insert(server_id, tools);
        Ok(())
    }

    /// Makes subsequent handshakes with a server fail.
    ///
    /// # Errors
    ///
    /// Returns connector runtime errors when lock acquisition fails.
    pub fn fail_connections(
        &self,
        server_id: ServerId,
        message: impl Into<String>,
    ) -> ConnectorResult<()> {
        self.write()?
            .connect_failures
            .insert(server_id, message.into().trim().to_owned());
        Ok(())
    }

    /// Lets handshakes with a server succeed again.
    ///
    /// # Errors
    ///
    /// Returns connector runtime errors when lock acquisition fails.
    pub fn restore_connections(&self, server_id: &ServerId) -> ConnectorResult<()> {
        self.write()?.connect_failures.remove(server_id);
        Ok(())
    }

    /// Delays every handshake with a server by `delay`.
    ///
    /// # Errors
    ///
    /// Returns connector runtime errors when lock acquisition fails.
    pub fn set_connect_delay(&self, server_id: ServerId, delay: Duration) -> ConnectorResult<()> {
        self.write()?.connect_delays.insert(server_id, delay);
        Ok(())
    }

    /// Delays every disconnect from a server by `delay`.
    ///
    /// # Errors
    ///
    /// Returns connector runtime errors when lock acquisition fails.
    pub fn set_disconnect_delay(&self, server_id: ServerId, delay: Duration) -> ConnectorResult<()> {
        self.write()?.disconnect_delays.insert(server_id, delay);
        Ok(())
    }

    /// Delays every health probe of a server by `delay`.
    ///
    /// # Errors
    ///
    /// Returns connector runtime errors when lock acquisition fails.
    pub fn set_health_check_delay(
        &self,
        server_id: ServerId,
        delay: Duration,
    ) -> ConnectorResult<()> {
        self.write()?.health_check_delays.insert(server_id, delay);
        Ok(())
    }

    /// Makes health probes of a server fail with a diagnostic message.
    ///
    /// # Errors
    ///
    /// Returns connector runtime errors when lock acquisition fails.
    pub fn set_unhealthy(
        &self,
        server_id: ServerId,
        message: impl Into<String>,
    ) -> ConnectorResult<()> {
        self.write()?
            .unhealthy_servers
            .insert(server_id, message.into().trim().to_owned());
        Ok(())
    }

    /// Scripts the result of calling `tool_name` on a server. `Err` values
    /// are reported as tool failures.
    ///
    /// # Errors
    ///
    /// Returns connector runtime errors when lock acquisition fails.
    pub fn set_tool_result(
        &self,
        server_id: ServerId,
        tool_name: impl Into<String>,
        result: Result<Value, String>,
    ) -> ConnectorResult<()> {
        self.write()?
            .tool_results
            .insert((server_id, tool_name.into()), result);
        Ok(())
    }

    /// Returns whether a session is open for the server.
    ///
    /// # Errors
    ///
    /// Returns connector runtime errors when lock acquisition fails.
    pub fn is_connected(&self, server_id: &ServerId) -> ConnectorResult<bool> {
        Ok(self.read()?.sessions.contains_key(server_id))
    }

    /// Returns how many handshakes were attempted with the server.
    ///
    /// # Errors
    ///
    /// Returns connector runtime errors when lock acquisition fails.
    pub fn connect_attempts(&self, server_id: &ServerId) -> ConnectorResult<u64> {
        Ok(self
            .read()?
            .connect_attempts
            .get(server_id)
            .copied()
            .unwrap_or_default())
    }

    fn require_session(
        &self,
        server: &ServerDescriptor,
        session_id: SessionId,
    ) -> ConnectorResult<()> {
        match self.read()?.sessions.get(server.id()) {
            Some(open) if *open == session_id => Ok(()),
            Some(_) => Err(ConnectorError::Unreachable(
                server.id().clone(),
                format!("session {session_id} was replaced"),
            )),
            None => Err(ConnectorError::Unreachable(
                server.id().clone(),
                "no open session".to_owned(),
            )),
        }
    }
}

#[async_trait]
impl ServerConnector for InMemoryServerConnector {
    async fn connect(
        &self,
        server: &ServerDescriptor,
        session_id: SessionId,
        api_key: Option<String>,
    ) -> ConnectorResult<Handshake> {
        let delay = {
            let mut state = self.write()?;
            let attempts = state.connect_attempts.entry(server.id().clone()).or_default();
            *attempts = attempts.saturating_add(1);
            state.connect_delays.get(server.id()).copied()
        };

        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }

        if server.requires_api_key() && api_key.is_none() {
            return Err(ConnectorError::Unauthorized(
                server.id().clone(),
                "missing API key".to_owned(),
            ));
        }

        let mut state = self.write()?;
        if let Some(message) = state.connect_failures.get(server.id()) {
            return Err(ConnectorError::Unreachable(
                server.id().clone(),
                message.clone(),
            ));
        }

        state.sessions.insert(server.id().clone(), session_id);
        state.unhealthy_servers.remove(server.id());
        let tools = state
            .tool_catalogs
            .get(server.id())
            .cloned()
            .unwrap_or_default();
        Ok(Handshake {
            tools,
            latency: delay,
        })
    }

    async fn disconnect(
        &self,
        server: &ServerDescriptor,
        session_id: SessionId,
    ) -> ConnectorResult<()> {
        let delay = self.read()?.disconnect_delays.get(server.id()).copied();
        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }

        let mut state = self.write()?;
        if state.sessions.get(server.id()) == Some(&session_id) {
            state.sessions.remove(server.id());
            state.unhealthy_servers.remove(server.id());
        }
        Ok(())
    }

    async fn health_check(
        &self,
        server: &ServerDescriptor,
        session_id: SessionId,
    ) -> ConnectorResult<()> {
        let delay = self.read()?.health_check_delays.get(server.id()).copied();
        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }

        self.require_session(server, session_id)?;
        let state = self.read()?;
        if let Some(message) = state.unhealthy_servers.get(server.id()) {
            return Err(ConnectorError::Unreachable(
                server.id().clone(),
                message.clone(),
            ));
        }
        Ok(())
    }

    async fn call_tool(
        &self,
        server: &ServerDescriptor,
        session_id: SessionId,
        tool_name: &str,
        arguments: Value,
    ) -> ConnectorResult<Value> {
        self.require_session(server, session_id)?;
        let state = self.read()?;
        match state
            .tool_results
            .get(&(server.id().clone(), tool_name.to_owned()))
        {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(ConnectorError::ToolFailed {
                server_id: server.id().clone(),
                tool_name: tool_name.to_owned(),
                message: message.clone(),
            }),
            None => Ok(json!({"tool": tool_name, "arguments": arguments})),
        }
    }
}
