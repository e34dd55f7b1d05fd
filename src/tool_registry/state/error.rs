//! Errors raised by the registry state components.

use crate::tool_registry::domain::{ConnectionStatus, ServerId};
use thiserror::Error;

/// Result type for registry state operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors returned by the server registry, connection tracker and ledger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No server is registered under the identifier.
    #[error("MCP server not found: {0}")]
    NotFound(ServerId),

    /// A server with the same identifier is already registered.
    #[error("duplicate MCP server identifier: {0}")]
    DuplicateServer(ServerId),

    /// The server does not expose the named tool.
    #[error("MCP server {server_id} has no tool named '{tool_name}'")]
    UnknownTool {
        /// Server identifier.
        server_id: ServerId,
        /// Requested tool name.
        tool_name: String,
    },

    /// The requested state change is not allowed from the current state.
    #[error("invalid transition for MCP server {server_id}: {from} -> {to}")]
    InvalidTransition {
        /// Server identifier.
        server_id: ServerId,
        /// Current status.
        from: ConnectionStatus,
        /// Requested status.
        to: ConnectionStatus,
    },

    /// A lock guarding registry state was poisoned by a panicking writer.
    #[error("registry state lock poisoned: {0}")]
    LockPoisoned(String),
}

impl RegistryError {
    pub(crate) fn poisoned(err: impl std::fmt::Display) -> Self {
        Self::LockPoisoned(err.to_string())
    }
}
