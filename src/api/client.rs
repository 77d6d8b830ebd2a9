//! HTTP client for PokeAPI
//!
//! Performs plain GET requests with reqwest and hands back the raw body, so
//! callers can both decode it and cache the exact bytes received.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::Fetch;

/// User agent sent with every request
const USER_AGENT: &str = concat!("pokedex-cli/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when fetching or decoding API data
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Failed to parse a response body, fresh or cached
    #[error("Failed to parse API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A base URL that cannot have API paths appended to it
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Returns true if the error came from the network rather than decoding
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, ApiError::Request(_) | ApiError::Status { .. })
    }

    /// Returns true for a 404 from the server
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// Client for fetching resources from PokeAPI
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    client: Client,
}

impl Default for PokeApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PokeApiClient {
    /// Create a new client with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a new client whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for PokeApiClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        debug!(url, "GET");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!(url, bytes = body.len(), "Response received");
        Ok(body.to_vec())
    }
}
