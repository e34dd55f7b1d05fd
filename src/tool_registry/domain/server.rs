//! Static catalogue metadata for an external tool server.

use super::{ParseServerCategoryError, ServerId, ToolRegistryDomainError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Kind of integration a server provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerCategory {
    /// Search provider such as a web search API.
    WebSearch,
    /// Database client.
    Database,
    /// Generic third-party HTTP API.
    Api,
    /// Local or remote file system access.
    FileSystem,
    /// Anything else supplied by the host application.
    Custom,
}

impl ServerCategory {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WebSearch => "web_search",
            Self::Database => "database",
            Self::Api => "api",
            Self::FileSystem => "file_system",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ServerCategory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServerCategory {
    type Error = ParseServerCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "web_search" => Ok(Self::WebSearch),
            "database" => Ok(Self::Database),
            "api" => Ok(Self::Api),
            "file_system" => Ok(Self::FileSystem),
            "custom" => Ok(Self::Custom),
            _ => Err(ParseServerCategoryError(value.to_owned())),
        }
    }
}

/// Identity and static metadata for one external tool server.
///
/// Descriptors are immutable once registered; administrative edits replace
/// the whole descriptor through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDescriptor {
    id: ServerId,
    name: String,
    description: String,
    category: ServerCategory,
    requires_api_key: bool,
    api_key_name: Option<String>,
    config: BTreeMap<String, Value>,
}

impl ServerDescriptor {
    /// Creates a descriptor with required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyServerName`] when `name` is
    /// empty after trimming.
    pub fn new(
        id: ServerId,
        name: impl Into<String>,
        category: ServerCategory,
    ) -> Result<Self, ToolRegistryDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(ToolRegistryDomainError::EmptyServerName);
        }

        Ok(Self {
            id,
            name: normalized_name,
            description: String::new(),
            category,
            requires_api_key: false,
            api_key_name: None,
            config: BTreeMap::new(),
        })
    }

    /// Sets a human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into().trim().to_owned();
        self
    }

    /// Marks the server as requiring the named API key.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyApiKeyName`] when the key name
    /// is empty after trimming.
    pub fn with_api_key(
        mut self,
        api_key_name: impl Into<String>,
    ) -> Result<Self, ToolRegistryDomainError> {
        let normalized = api_key_name.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(ToolRegistryDomainError::EmptyApiKeyName);
        }

        self.requires_api_key = true;
        self.api_key_name = Some(normalized);
        Ok(self)
    }

    /// Replaces the opaque configuration map.
    #[must_use]
    pub fn with_config(mut self, values: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.config = values.into_iter().collect();
        self
    }

    /// Returns the server identifier.
    #[must_use]
    pub const fn id(&self) -> &ServerId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, empty when none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the server category.
    #[must_use]
    pub const fn category(&self) -> ServerCategory {
        self.category
    }

    /// Returns whether an API key must be available before connecting.
    #[must_use]
    pub const fn requires_api_key(&self) -> bool {
        self.requires_api_key
    }

    /// Returns the name of the required API key, if any.
    #[must_use]
    pub fn api_key_name(&self) -> Option<&str> {
        self.api_key_name.as_deref()
    }

    /// Returns the opaque configuration map.
    #[must_use]
    pub const fn config(&self) -> &BTreeMap<String, Value> {
        &self.config
    }
}
