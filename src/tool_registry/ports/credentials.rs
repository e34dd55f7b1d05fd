//! Credential port for servers that require an API key.

/// Looks up API keys by the name recorded on a server descriptor.
pub trait CredentialSource: Send + Sync {
    /// Returns the key stored under `key_name`, or `None` when absent or
    /// empty.
    fn api_key(&self, key_name: &str) -> Option<String>;
}
