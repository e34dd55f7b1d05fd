//! In-memory integration tests for the registry core.
//!
//! Tests are organized into modules by functionality:
//! - `lifecycle_tests`: Start/stop/connect/disconnect state transitions
//! - `cancellation_tests`: Abandoned callers and concurrent starts
//! - `tool_call_tests`: Tool invocation, ledger and usage counters
//! - `control_plane_tests`: Boundary shapes and error surfacing

mod in_memory {
    pub mod helpers;

    mod cancellation_tests;
    mod control_plane_tests;
    mod lifecycle_tests;
    mod tool_call_tests;
}
