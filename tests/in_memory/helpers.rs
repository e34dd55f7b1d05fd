//! Shared fixtures for in-memory registry integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use std::time::Duration;
use switchboard::config::RegistryConfig;
use switchboard::tool_registry::{
    adapters::{InMemoryServerConnector, StaticCredentials},
    domain::{ServerCategory, ServerDescriptor, ServerId, ToolDescriptor},
    services::{ControlPlane, LifecycleController},
    state::{McpState, ServerRegistry},
};

/// Lifecycle controller wired to the in-memory connector.
pub type TestController = LifecycleController<InMemoryServerConnector, StaticCredentials, DefaultClock>;

/// Control plane wired to the in-memory connector.
pub type TestPlane = ControlPlane<InMemoryServerConnector, StaticCredentials, DefaultClock>;

/// Connector, state and controller sharing one registry.
pub struct Harness {
    pub connector: Arc<InMemoryServerConnector>,
    pub state: McpState,
    pub controller: TestController,
}

impl Harness {
    /// Wraps the controller in a control plane.
    pub fn plane(&self) -> TestPlane {
        ControlPlane::new(self.controller.clone())
    }
}

/// Parses an identifier known to be valid.
pub fn id(value: &str) -> ServerId {
    ServerId::new(value).expect("valid id")
}

/// Web search server requiring the `BRAVE_API_KEY` credential.
pub fn search_server() -> ServerDescriptor {
    ServerDescriptor::new(id("brave-search"), "Brave Search", ServerCategory::WebSearch)
        .expect("valid descriptor")
        .with_api_key("BRAVE_API_KEY")
        .expect("valid key name")
}

/// Database server without credentials.
pub fn database_server() -> ServerDescriptor {
    ServerDescriptor::new(id("postgres"), "PostgreSQL", ServerCategory::Database)
        .expect("valid descriptor")
        .with_description("Query a PostgreSQL database")
}

/// A `query` tool requiring a `sql` argument.
pub fn query_tool() -> ToolDescriptor {
    ToolDescriptor::new("query", "Runs a read-only SQL query")
        .expect("valid tool")
        .with_parameters(
            serde_json::json!({"sql": {"type": "string"}}),
            ["sql".to_owned()],
        )
        .expect("valid schema")
}

/// Builds a harness over the two seeded servers with the given config.
pub fn harness_with(config: RegistryConfig, credentials: StaticCredentials) -> Harness {
    let connector = Arc::new(InMemoryServerConnector::new());
    connector
        .set_tool_catalog(database_server().id().clone(), vec![query_tool()])
        .expect("catalogue script should apply");
    let registry =
        ServerRegistry::seeded([search_server(), database_server()]).expect("seed should succeed");
    let state = McpState::new(registry, config.retention());
    let controller = LifecycleController::new(
        state.clone(),
        Arc::clone(&connector),
        Arc::new(credentials),
        Arc::new(DefaultClock),
        config,
    );
    Harness {
        connector,
        state,
        controller,
    }
}

/// Default harness: short connect timeout, search key present.
#[fixture]
pub fn harness() -> Harness {
    harness_with(
        RegistryConfig::default().with_connect_timeout(Duration::from_millis(100)),
        StaticCredentials::new().with_key("BRAVE_API_KEY", "test-key"),
    )
}
