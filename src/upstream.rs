//! Upstream Client
//!
//! Issues the authenticated vehicle-history GET and returns the raw JSON
//! document. Turning that document into a typed record is the mapper's job.

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{LookupError, Result};
use crate::token::AccessToken;

// == Vehicle API Client ==
/// Thin client for the vehicle-history endpoint.
pub struct VehicleApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl VehicleApiClient {
    /// Creates a client for the given base URL. The normalized registration
    /// is appended to it as a path segment on each fetch.
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        // A trailing slash would double up once the registration is appended
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Fetches the raw vehicle-history document for a normalized
    /// registration.
    ///
    /// # Errors
    /// - `UpstreamHttp` for any non-2xx answer, carrying status and body
    ///   (404 means the registration is unknown upstream)
    /// - `UpstreamTimeout` / `Transport` when the request or body read fails
    ///
    /// Never retried.
    pub async fn fetch(&self, registration: &str, token: &AccessToken) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, registration);
        debug!("Fetching vehicle history from {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.as_str())
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .map_err(LookupError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(LookupError::from_transport)
    }
}
