//! Kiln HTTP Client
//!
//! A small, type-safe client for the sandbox provider's template build API.
//!
//! The [`TemplateBuilder`] trait is the seam the pipeline step builds through;
//! [`TemplateClient`] is its HTTP implementation.
//!
//! # Example
//!
//! ```no_run
//! use kiln_client::{BuildLogSink, ClientConfig, ProviderCredentials, TemplateBuilder, TemplateClient};
//! use kiln_core::domain::log::BuildLogEntry;
//! use kiln_core::domain::template::{BuildRequest, TemplateSpec};
//!
//! struct Stdout;
//!
//! impl BuildLogSink for Stdout {
//!     fn on_log(&self, entry: &BuildLogEntry) {
//!         println!("{} {}", entry.level, entry.message);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::new("https://api.e2b.app", ProviderCredentials::new("e2b_..."));
//!     let client = TemplateClient::new(config)?;
//!
//!     let info = client
//!         .build(
//!             &BuildRequest {
//!                 alias: "my-image-latest".to_string(),
//!                 cpu_count: Some(2),
//!                 memory_mb: Some(1024),
//!                 template: TemplateSpec::from_image("ghcr.io/org/my-image:latest"),
//!             },
//!             &Stdout,
//!         )
//!         .await?;
//!
//!     println!("Built template {}", info.template_id);
//!     Ok(())
//! }
//! ```

mod builder;
pub mod config;
pub mod error;
mod templates;

// Re-export commonly used types
pub use builder::{BuildLogSink, TemplateBuilder};
pub use config::{ClientConfig, DEFAULT_API_URL, ProviderCredentials};
pub use error::{ClientError, Result};

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Header carrying the provider API key
const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the provider's template API
///
/// Endpoints are grouped into:
/// - Template registration (create alias, reserve build)
/// - Build lifecycle (start, poll status and logs)
#[derive(Debug, Clone)]
pub struct TemplateClient {
    /// Base URL of the provider API
    base_url: String,
    /// Interval between build status polls
    poll_interval: Duration,
    /// HTTP client instance, authenticated with the API key
    client: Client,
}

impl TemplateClient {
    /// Create a new template client
    ///
    /// The API key is attached to every request as a default header.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut api_key = HeaderValue::from_str(config.credentials.api_key())
            .map_err(|_| ClientError::InvalidRequest("API key contains invalid characters".to_string()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            base_url: config.base_url,
            poll_interval: config.poll_interval,
            client,
        })
    }

    /// Get the base URL of the provider API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is ignored (e.g., 202 Accepted)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
