//! MCP server registry core.
//!
//! Tracks which tool servers are registered, what state each connection is
//! in, and how their tool calls have fared. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Shared process state in [`state`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod state;
