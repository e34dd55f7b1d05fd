//! Port contracts for the collaborators the registry core depends on.

mod connector;
mod credentials;

pub use connector::{ConnectorError, ConnectorResult, Handshake, ServerConnector};
pub use credentials::CredentialSource;

#[cfg(test)]
pub use connector::MockServerConnector;
