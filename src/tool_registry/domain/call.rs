//! Tool invocation records and their cumulative totals.

use super::ServerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One attempt to invoke a tool on a server. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    server_id: ServerId,
    tool_name: String,
    timestamp: DateTime<Utc>,
    response_time_ms: u64,
    success: bool,
    error: Option<String>,
}

impl CallRecord {
    /// Creates a record of a successful call.
    #[must_use]
    pub fn succeeded(
        server_id: ServerId,
        tool_name: impl Into<String>,
        timestamp: DateTime<Utc>,
        response_time_ms: u64,
    ) -> Self {
        Self {
            server_id,
            tool_name: tool_name.into(),
            timestamp,
            response_time_ms,
            success: true,
            error: None,
        }
    }

    /// Creates a record of a failed call.
    #[must_use]
    pub fn failed(
        server_id: ServerId,
        tool_name: impl Into<String>,
        timestamp: DateTime<Utc>,
        response_time_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            server_id,
            tool_name: tool_name.into(),
            timestamp,
            response_time_ms,
            success: false,
            error: Some(error.into()),
        }
    }

    /// Returns the server the call targeted.
    #[must_use]
    pub const fn server_id(&self) -> &ServerId {
        &self.server_id
    }

    /// Returns the invoked tool name.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns when the call completed.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the measured latency in milliseconds.
    #[must_use]
    pub const fn response_time_ms(&self) -> u64 {
        self.response_time_ms
    }

    /// Returns whether the call succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Returns the failure message of an unsuccessful call.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Monotonic per-server counters, unaffected by ledger eviction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallTotals {
    calls: u64,
    successes: u64,
    response_time_ms: u64,
}

impl CallTotals {
    /// Folds one call into the totals.
    pub const fn record(&mut self, record: &CallRecord) {
        self.calls = self.calls.saturating_add(1);
        if record.success {
            self.successes = self.successes.saturating_add(1);
        }
        self.response_time_ms = self.response_time_ms.saturating_add(record.response_time_ms);
    }

    /// Returns the number of calls ever recorded.
    #[must_use]
    pub const fn calls(&self) -> u64 {
        self.calls
    }

    /// Returns the number of successful calls ever recorded.
    #[must_use]
    pub const fn successes(&self) -> u64 {
        self.successes
    }

    /// Returns the summed latency of all recorded calls.
    #[must_use]
    pub const fn total_response_time_ms(&self) -> u64 {
        self.response_time_ms
    }
}
