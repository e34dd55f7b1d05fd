//! Tool descriptor value object.

use super::ToolRegistryDomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata for one tool exposed by an MCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    name: String,
    description: String,
    parameter_schema: Map<String, Value>,
    required: Vec<String>,
    enabled: bool,
    usage_count: u64,
}

impl ToolDescriptor {
    /// Creates an enabled tool descriptor with an empty parameter schema.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when name or description is empty.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ToolRegistryDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(ToolRegistryDomainError::EmptyToolName);
        }

        let normalized_description = description.into().trim().to_owned();
        if normalized_description.is_empty() {
            return Err(ToolRegistryDomainError::EmptyToolDescription);
        }

        Ok(Self {
            name: normalized_name,
            description: normalized_description,
            parameter_schema: Map::new(),
            required: Vec::new(),
            enabled: true,
            usage_count: 0,
        })
    }

    /// Sets the accepted parameters and the required subset.
    ///
    /// `properties` maps each parameter name to its JSON schema fragment.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::InvalidParameterSchema`] when
    /// `properties` is not a JSON object, or
    /// [`ToolRegistryDomainError::UndeclaredRequiredParameter`] when a
    /// required name is missing from it.
    pub fn with_parameters(
        mut self,
        properties: Value,
        required: impl IntoIterator<Item = String>,
    ) -> Result<Self, ToolRegistryDomainError> {
        let Value::Object(schema) = properties else {
            return Err(ToolRegistryDomainError::InvalidParameterSchema(self.name));
        };

        let required_names: Vec<String> = required.into_iter().collect();
        if let Some(missing) = required_names
            .iter()
            .find(|parameter| !schema.contains_key(parameter.as_str()))
        {
            return Err(ToolRegistryDomainError::UndeclaredRequiredParameter {
                tool: self.name,
                parameter: missing.clone(),
            });
        }

        self.parameter_schema = schema;
        self.required = required_names;
        Ok(self)
    }

    /// Sets whether the tool may be invoked.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the usage counter reported alongside the descriptor.
    #[must_use]
    pub const fn with_usage_count(mut self, usage_count: u64) -> Self {
        self.usage_count = usage_count;
        self
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameter schema keyed by parameter name.
    #[must_use]
    pub const fn parameter_schema(&self) -> &Map<String, Value> {
        &self.parameter_schema
    }

    /// Returns the names of required parameters.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Returns whether the tool may be invoked.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns how many times the tool has been invoked.
    #[must_use]
    pub const fn usage_count(&self) -> u64 {
        self.usage_count
    }

    /// Returns the required parameters absent from `arguments`.
    #[must_use]
    pub fn missing_arguments(&self, arguments: &Value) -> Vec<&str> {
        self.required
            .iter()
            .filter(|name| arguments.get(name.as_str()).is_none())
            .map(String::as_str)
            .collect()
    }
}
