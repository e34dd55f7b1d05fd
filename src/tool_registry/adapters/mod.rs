//! Adapter implementations for the connector and credential ports.

mod credentials;
mod runtime;

pub use credentials::{EnvCredentials, StaticCredentials};
pub use runtime::InMemoryServerConnector;
