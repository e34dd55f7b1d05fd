//! Switchboard: registry core for MCP tool servers.
//!
//! This crate keeps track of the tool servers an agent can use, drives each
//! server through its connection lifecycle, records tool invocations, and
//! derives summary statistics for display.
//!
//! # Architecture
//!
//! Switchboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure value types and the connection state machine
//! - **Ports**: Abstract trait interfaces for the connector and credentials
//! - **Adapters**: Concrete implementations of ports (in-memory, environment)
//!
//! # Modules
//!
//! - [`config`]: Timeouts and ledger retention
//! - [`tool_registry`]: Registry state, lifecycle control, and statistics

pub mod config;
pub mod tool_registry;
