//! Error types for tool registry domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing tool registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolRegistryDomainError {
    /// The server identifier is empty after trimming.
    #[error("MCP server id must not be empty")]
    EmptyServerId,

    /// The server identifier contains characters outside `[A-Za-z0-9_.-]`.
    #[error("MCP server id '{0}' contains invalid characters")]
    InvalidServerId(String),

    /// The server identifier exceeds the length limit.
    #[error("MCP server id exceeds 100 character limit: {0}")]
    ServerIdTooLong(String),

    /// The server display name is empty after trimming.
    #[error("MCP server name must not be empty")]
    EmptyServerName,

    /// An API key is required but no key name was supplied.
    #[error("API key name must not be empty when an API key is required")]
    EmptyApiKeyName,

    /// A tool name is empty after trimming.
    #[error("tool name must not be empty")]
    EmptyToolName,

    /// A tool description is empty after trimming.
    #[error("tool description must not be empty")]
    EmptyToolDescription,

    /// A tool parameter schema is not a JSON object.
    #[error("parameter schema for tool '{0}' must be a JSON object")]
    InvalidParameterSchema(String),

    /// A required parameter is not declared in the tool's schema.
    #[error("tool '{tool}' lists required parameter '{parameter}' that is not declared")]
    UndeclaredRequiredParameter {
        /// Tool name.
        tool: String,
        /// Parameter listed as required.
        parameter: String,
    },
}

/// Error returned while parsing a server category.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown MCP server category: {0}")]
pub struct ParseServerCategoryError(pub String);

/// Error returned while parsing a connection status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown MCP connection status: {0}")]
pub struct ParseConnectionStatusError(pub String);

/// A requested connection state change is not an edge of the state machine.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("invalid MCP connection transition: {from} -> {to}")]
pub struct IllegalTransition {
    /// Status the connection was in.
    pub from: super::ConnectionStatus,
    /// Status that was requested.
    pub to: super::ConnectionStatus,
}
