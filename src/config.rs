//! Runtime configuration for the server registry.
//!
//! [`RegistryConfig`] deserializes with per-field defaults so it can be
//! embedded in a host application's configuration document, and
//! [`RegistryConfig::from_env`] overlays `SWITCHBOARD_*` environment
//! variables on the defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_DISCONNECT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_HEALTH_CHECK_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_TOOL_CALL_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_MAX_RECORDS_PER_SERVER: usize = 1_000;

const CONNECT_TIMEOUT_ENV: &str = "SWITCHBOARD_CONNECT_TIMEOUT_MS";
const DISCONNECT_TIMEOUT_ENV: &str = "SWITCHBOARD_DISCONNECT_TIMEOUT_MS";
const HEALTH_CHECK_TIMEOUT_ENV: &str = "SWITCHBOARD_HEALTH_CHECK_TIMEOUT_MS";
const TOOL_CALL_TIMEOUT_ENV: &str = "SWITCHBOARD_TOOL_CALL_TIMEOUT_MS";
const LEDGER_MAX_RECORDS_ENV: &str = "SWITCHBOARD_LEDGER_MAX_RECORDS";
const LEDGER_MAX_AGE_ENV: &str = "SWITCHBOARD_LEDGER_MAX_AGE_SECS";

/// Errors returned while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("failed to parse {name}='{value}': {reason}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// A timeout was configured as zero.
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    /// The ledger age bound was configured as zero, which would evict every
    /// record on append.
    #[error("retention.maxAgeSecs must be greater than zero")]
    ZeroRetentionAge,
}

/// Retention bounds for the call ledger. `None` leaves a bound open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetentionPolicy {
    max_records_per_server: Option<usize>,
    max_age_secs: Option<u64>,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_records_per_server: Some(DEFAULT_MAX_RECORDS_PER_SERVER),
            max_age_secs: None,
        }
    }
}

impl RetentionPolicy {
    /// Creates a policy with no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_records_per_server: None,
            max_age_secs: None,
        }
    }

    /// Keeps at most `count` records per server.
    #[must_use]
    pub const fn with_max_records(mut self, count: usize) -> Self {
        self.max_records_per_server = Some(count);
        self
    }

    /// Drops records older than `age`.
    ///
    /// The bound is kept in whole seconds; a fractional age is rounded up,
    /// so any non-zero `age` keeps at least one second of history.
    #[must_use]
    pub const fn with_max_age(mut self, age: Duration) -> Self {
        let whole = age.as_secs();
        self.max_age_secs = Some(if age.subsec_nanos() > 0 {
            whole.saturating_add(1)
        } else {
            whole
        });
        self
    }

    /// Returns the per-server record bound.
    #[must_use]
    pub const fn max_records_per_server(&self) -> Option<usize> {
        self.max_records_per_server
    }

    /// Returns the age bound.
    #[must_use]
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_secs.map(Duration::from_secs)
    }
}

/// Timeouts and retention settings for the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    connect_timeout_ms: u64,
    disconnect_timeout_ms: u64,
    health_check_timeout_ms: u64,
    tool_call_timeout_ms: u64,
    retention: RetentionPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            disconnect_timeout_ms: DEFAULT_DISCONNECT_TIMEOUT_MS,
            health_check_timeout_ms: DEFAULT_HEALTH_CHECK_TIMEOUT_MS,
            tool_call_timeout_ms: DEFAULT_TOOL_CALL_TIMEOUT_MS,
            retention: RetentionPolicy::default(),
        }
    }
}

impl RegistryConfig {
    /// Loads defaults overlaid with `SWITCHBOARD_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable does not parse or a timeout
    /// is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = parse_env::<u64>(CONNECT_TIMEOUT_ENV)? {
            config.connect_timeout_ms = value;
        }
        if let Some(value) = parse_env::<u64>(DISCONNECT_TIMEOUT_ENV)? {
            config.disconnect_timeout_ms = value;
        }
        if let Some(value) = parse_env::<u64>(HEALTH_CHECK_TIMEOUT_ENV)? {
            config.health_check_timeout_ms = value;
        }
        if let Some(value) = parse_env::<u64>(TOOL_CALL_TIMEOUT_ENV)? {
            config.tool_call_timeout_ms = value;
        }
        if let Some(value) = parse_env::<usize>(LEDGER_MAX_RECORDS_ENV)? {
            config.retention.max_records_per_server = Some(value);
        }
        if let Some(value) = parse_env::<u64>(LEDGER_MAX_AGE_ENV)? {
            config.retention.max_age_secs = Some(value);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that every timeout and the ledger age bound are non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] naming the offending setting, or
    /// [`ConfigError::ZeroRetentionAge`] for a zero age bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("connectTimeoutMs"));
        }
        if self.disconnect_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("disconnectTimeoutMs"));
        }
        if self.health_check_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("healthCheckTimeoutMs"));
        }
        if self.tool_call_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("toolCallTimeoutMs"));
        }
        if self.retention.max_age_secs == Some(0) {
            return Err(ConfigError::ZeroRetentionAge);
        }
        Ok(())
    }

    /// Sets the handshake bound.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = duration_millis(timeout);
        self
    }

    /// Sets the disconnect bound.
    #[must_use]
    pub fn with_disconnect_timeout(mut self, timeout: Duration) -> Self {
        self.disconnect_timeout_ms = duration_millis(timeout);
        self
    }

    /// Sets the health probe bound.
    #[must_use]
    pub fn with_health_check_timeout(mut self, timeout: Duration) -> Self {
        self.health_check_timeout_ms = duration_millis(timeout);
        self
    }

    /// Sets the tool call bound.
    #[must_use]
    pub fn with_tool_call_timeout(mut self, timeout: Duration) -> Self {
        self.tool_call_timeout_ms = duration_millis(timeout);
        self
    }

    /// Replaces the ledger retention policy.
    #[must_use]
    pub const fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Returns the handshake bound.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Returns the disconnect bound.
    #[must_use]
    pub const fn disconnect_timeout(&self) -> Duration {
        Duration::from_millis(self.disconnect_timeout_ms)
    }

    /// Returns the health probe bound.
    #[must_use]
    pub const fn health_check_timeout(&self) -> Duration {
        Duration::from_millis(self.health_check_timeout_ms)
    }

    /// Returns the tool call bound.
    #[must_use]
    pub const fn tool_call_timeout(&self) -> Duration {
        Duration::from_millis(self.tool_call_timeout_ms)
    }

    /// Returns the ledger retention policy.
    #[must_use]
    pub const fn retention(&self) -> RetentionPolicy {
        self.retention
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn parse_env<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|err| ConfigError::InvalidValue {
            name,
            value: raw.clone(),
            reason: err.to_string(),
        })
}
