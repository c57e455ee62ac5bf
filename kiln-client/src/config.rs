//! Client configuration
//!
//! Connection settings and credentials for the sandbox provider API.

use std::fmt;
use std::time::Duration;

/// Default provider API endpoint
pub const DEFAULT_API_URL: &str = "https://api.e2b.app";

/// API key for the sandbox provider
///
/// Passed explicitly to the client; never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    api_key: String,
}

impl ProviderCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &"***")
            .finish()
    }
}

/// Template client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the provider API (e.g., "https://api.e2b.app")
    pub base_url: String,

    pub credentials: ProviderCredentials,

    /// How often to poll a running build for status and logs
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Creates a configuration with the default poll interval
    pub fn new(base_url: impl Into<String>, credentials: ProviderCredentials) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            poll_interval: Duration::from_secs(1),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}
