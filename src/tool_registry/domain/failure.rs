//! Recoverable failures of external connection attempts.

use std::fmt;
use std::time::Duration;

/// Why an external handshake, health probe, or tool call did not succeed.
///
/// These never escape the lifecycle controller as errors; they are folded
/// into the `error` state and a failed outcome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleFailure {
    /// The external side rejected or could not complete the operation.
    ConnectionFailure(String),
    /// The external side did not answer within the configured bound.
    Timeout(Duration),
}

impl LifecycleFailure {
    /// Creates a connection failure from any displayable cause.
    pub fn connection(cause: impl fmt::Display) -> Self {
        Self::ConnectionFailure(cause.to_string())
    }

    /// Returns whether this failure was a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl fmt::Display for LifecycleFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailure(cause) => write!(formatter, "connection failed: {cause}"),
            Self::Timeout(limit) => {
                write!(formatter, "timed out after {}ms", limit.as_millis())
            }
        }
    }
}
