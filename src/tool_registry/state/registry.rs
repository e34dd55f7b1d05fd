//! Catalogue of known servers and the tools they advertise.

use super::{RegistryError, RegistryResult};
use crate::tool_registry::domain::{ServerDescriptor, ServerId, ToolDescriptor};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe catalogue of registered servers, listed in insertion order.
#[derive(Debug, Default)]
pub struct ServerRegistry {
    state: RwLock<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    order: Vec<ServerId>,
    entries: HashMap<ServerId, RegistryEntry>,
}

#[derive(Debug)]
struct RegistryEntry {
    descriptor: ServerDescriptor,
    tools: Vec<ToolDescriptor>,
}

impl RegistryState {
    fn entry(&self, server_id: &ServerId) -> RegistryResult<&RegistryEntry> {
        self.entries
            .get(server_id)
            .ok_or_else(|| RegistryError::NotFound(server_id.clone()))
    }

    fn entry_mut(&mut self, server_id: &ServerId) -> RegistryResult<&mut RegistryEntry> {
        self.entries
            .get_mut(server_id)
            .ok_or_else(|| RegistryError::NotFound(server_id.clone()))
    }
}

impl ServerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-seeded with known servers.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateServer`] when two descriptors share
    /// an identifier.
    pub fn seeded(
        descriptors: impl IntoIterator<Item = ServerDescriptor>,
    ) -> RegistryResult<Self> {
        let registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    fn read(&self) -> RegistryResult<RwLockReadGuard<'_, RegistryState>> {
        self.state.read().map_err(RegistryError::poisoned)
    }

    fn write(&self) -> RegistryResult<RwLockWriteGuard<'_, RegistryState>> {
        self.state.write().map_err(RegistryError::poisoned)
    }

    /// Registers a new server.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateServer`] when the identifier is
    /// already registered.
    pub fn register(&self, descriptor: ServerDescriptor) -> RegistryResult<()> {
        let mut state = self.write()?;
        let server_id = descriptor.id().clone();
        if state.entries.contains_key(&server_id) {
            return Err(RegistryError::DuplicateServer(server_id));
        }

        state.order.push(server_id.clone());
        state.entries.insert(
            server_id,
            RegistryEntry {
                descriptor,
                tools: Vec::new(),
            },
        );
        Ok(())
    }

    /// Replaces the descriptor of a registered server, keeping its tools.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the server is unknown.
    pub fn update(&self, descriptor: ServerDescriptor) -> RegistryResult<()> {
        let server_id = descriptor.id().clone();
        let mut state = self.write()?;
        state.entry_mut(&server_id)?.descriptor = descriptor;
        Ok(())
    }

    /// Returns the descriptor of a registered server.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the server is unknown.
    pub fn get(&self, server_id: &ServerId) -> RegistryResult<ServerDescriptor> {
        Ok(self.read()?.entry(server_id)?.descriptor.clone())
    }

    /// Returns whether a server is registered.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the registry lock is
    /// poisoned.
    pub fn contains(&self, server_id: &ServerId) -> RegistryResult<bool> {
        Ok(self.read()?.entries.contains_key(server_id))
    }

    /// Returns every descriptor in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the registry lock is
    /// poisoned.
    pub fn list(&self) -> RegistryResult<Vec<ServerDescriptor>> {
        let state = self.read()?;
        Ok(state
            .order
            .iter()
            .filter_map(|server_id| state.entries.get(server_id))
            .map(|entry| entry.descriptor.clone())
            .collect())
    }

    /// Returns the number of registered servers.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the registry lock is
    /// poisoned.
    pub fn len(&self) -> RegistryResult<usize> {
        Ok(self.read()?.order.len())
    }

    /// Returns whether no server is registered.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the registry lock is
    /// poisoned.
    pub fn is_empty(&self) -> RegistryResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Replaces the tool catalogue of a server.
    ///
    /// Tools that were disabled keep their `enabled` flag when the server
    /// advertises them again.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the server is unknown.
    pub fn set_tools(
        &self,
        server_id: &ServerId,
        tools: Vec<ToolDescriptor>,
    ) -> RegistryResult<()> {
        let mut state = self.write()?;
        let entry = state.entry_mut(server_id)?;
        let disabled: Vec<String> = entry
            .tools
            .iter()
            .filter(|tool| !tool.enabled())
            .map(|tool| tool.name().to_owned())
            .collect();

        entry.tools = tools
            .into_iter()
            .map(|tool| {
                let keep_disabled = disabled.iter().any(|name| name == tool.name());
                if keep_disabled {
                    tool.with_enabled(false)
                } else {
                    tool
                }
            })
            .collect();
        Ok(())
    }

    /// Returns the tool catalogue of a server.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the server is unknown.
    pub fn tools(&self, server_id: &ServerId) -> RegistryResult<Vec<ToolDescriptor>> {
        Ok(self.read()?.entry(server_id)?.tools.clone())
    }

    /// Returns one tool of a server.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the server is unknown or
    /// [`RegistryError::UnknownTool`] when it has no such tool.
    pub fn tool(&self, server_id: &ServerId, tool_name: &str) -> RegistryResult<ToolDescriptor> {
        self.read()?
            .entry(server_id)?
            .tools
            .iter()
            .find(|tool| tool.name() == tool_name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownTool {
                server_id: server_id.clone(),
                tool_name: tool_name.to_owned(),
            })
    }

    /// Enables or disables one tool of a server.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the server is unknown or
    /// [`RegistryError::UnknownTool`] when it has no such tool.
    pub fn set_tool_enabled(
        &self,
        server_id: &ServerId,
        tool_name: &str,
        enabled: bool,
    ) -> RegistryResult<()> {
        let mut state = self.write()?;
        let entry = state.entry_mut(server_id)?;
        let tool = entry
            .tools
            .iter_mut()
            .find(|tool| tool.name() == tool_name)
            .ok_or_else(|| RegistryError::UnknownTool {
                server_id: server_id.clone(),
                tool_name: tool_name.to_owned(),
            })?;
        *tool = tool.clone().with_enabled(enabled);
        Ok(())
    }
}
