//! Credential sources backed by the environment or a fixed map.

use crate::tool_registry::ports::CredentialSource;
use std::collections::HashMap;
use std::env;

/// Reads API keys from process environment variables of the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn api_key(&self, key_name: &str) -> Option<String> {
        env::var(key_name)
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }
}

/// Serves API keys from an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    keys: HashMap<String, String>,
}

impl StaticCredentials {
    /// Creates an empty credential map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key.
    #[must_use]
    pub fn with_key(mut self, key_name: impl Into<String>, value: impl Into<String>) -> Self {
        self.keys.insert(key_name.into(), value.into());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn api_key(&self, key_name: &str) -> Option<String> {
        self.keys
            .get(key_name)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }
}
