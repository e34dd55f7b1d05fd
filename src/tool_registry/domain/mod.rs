//! Domain model for MCP server registration, connection, and call metrics.
//!
//! The tool registry domain models server identity and catalogue metadata,
//! the connection state machine, tool descriptors, call records, and the
//! derived statistics computed from them. Locking and infrastructure
//! concerns remain outside this boundary.

mod call;
mod connection;
mod error;
mod failure;
mod ids;
mod server;
mod stats;
mod tool;

pub use call::{CallRecord, CallTotals};
pub use connection::{ConnectionState, ConnectionStatus, ConnectionTransition};
pub use error::{
    IllegalTransition, ParseConnectionStatusError, ParseServerCategoryError,
    ToolRegistryDomainError,
};
pub use failure::LifecycleFailure;
pub use ids::{ServerId, SessionId};
pub use server::{ServerCategory, ServerDescriptor};
pub use stats::{ServerCallStats, ServerSample, ServerStats, round_to_millis, round_to_tenth};
pub use tool::ToolDescriptor;
