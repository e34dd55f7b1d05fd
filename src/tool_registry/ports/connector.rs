//! Connection port for external MCP tool servers.

use crate::tool_registry::domain::{ServerDescriptor, ServerId, SessionId, ToolDescriptor};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Data returned by a completed handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Handshake {
    /// Tools the server advertised.
    pub tools: Vec<ToolDescriptor>,
    /// Handshake latency, when the connector measured it.
    pub latency: Option<Duration>,
}

impl Handshake {
    /// Creates a handshake advertising `tools`.
    #[must_use]
    pub const fn with_tools(tools: Vec<ToolDescriptor>) -> Self {
        Self {
            tools,
            latency: None,
        }
    }
}

/// Opaque "connect" primitive supplied by the host application for each
/// server category (a search API client, a database client, and so on).
///
/// Implementations do not need to bound their own latency; the lifecycle
/// controller applies the configured timeouts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServerConnector: Send + Sync {
    /// Performs the handshake for a server. `api_key` is resolved from the
    /// credential source when the server requires one.
    async fn connect(
        &self,
        server: &ServerDescriptor,
        session_id: SessionId,
        api_key: Option<String>,
    ) -> ConnectorResult<Handshake>;

    /// Tears down the session of a connected server.
    async fn disconnect(
        &self,
        server: &ServerDescriptor,
        session_id: SessionId,
    ) -> ConnectorResult<()>;

    /// Probes a connected server.
    async fn health_check(
        &self,
        server: &ServerDescriptor,
        session_id: SessionId,
    ) -> ConnectorResult<()>;

    /// Invokes a tool on a connected server.
    async fn call_tool(
        &self,
        server: &ServerDescriptor,
        session_id: SessionId,
        tool_name: &str,
        arguments: Value,
    ) -> ConnectorResult<Value>;
}

/// Errors returned by connector implementations.
#[derive(Debug, Clone, Error)]
pub enum ConnectorError {
    /// The server could not be reached.
    #[error("MCP server {0} is unreachable: {1}")]
    Unreachable(ServerId, String),

    /// The server rejected the supplied credentials.
    #[error("MCP server {0} rejected credentials: {1}")]
    Unauthorized(ServerId, String),

    /// The server answered a tool call with an error.
    #[error("tool '{tool_name}' on MCP server {server_id} failed: {message}")]
    ToolFailed {
        /// Server identifier.
        server_id: ServerId,
        /// Tool name.
        tool_name: String,
        /// Error reported by the server.
        message: String,
    },

    /// Generic runtime failure.
    #[error("MCP connector runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConnectorError {
    /// Wraps a runtime error from the connector.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
