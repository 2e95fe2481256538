//! Configuration Module
//!
//! Handles loading server configuration from environment variables.
//! DVSA credentials and endpoints are required; their absence is a
//! startup-time fatal error, never a per-request one.

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth2 client id for the client-credentials exchange
    pub client_id: String,
    /// OAuth2 client secret for the client-credentials exchange
    pub client_secret: String,
    /// API key sent as `X-API-Key` on vehicle lookups
    pub api_key: String,
    /// OAuth2 token endpoint URL
    pub token_url: String,
    /// OAuth2 scope value requested in the exchange
    pub scope_url: String,
    /// Base URL of the vehicle-history endpoint; the normalized
    /// registration is appended as a path segment
    pub base_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Background cache sweep interval in seconds
    pub cleanup_interval: u64,
    /// Request timeout in seconds for token and vehicle calls
    pub http_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DVSA_CLIENT_ID`, `DVSA_CLIENT_SECRET`, `DVSA_API_KEY`,
    ///   `DVSA_TOKEN_URL`, `DVSA_SCOPE_URL`, `DVSA_BASE_URL` - required
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - cache sweep frequency in seconds (default: 60)
    /// - `HTTP_TIMEOUT` - upstream request timeout in seconds (default: 10)
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: required("DVSA_CLIENT_ID")?,
            client_secret: required("DVSA_CLIENT_SECRET")?,
            api_key: required("DVSA_API_KEY")?,
            token_url: required("DVSA_TOKEN_URL")?,
            scope_url: required("DVSA_SCOPE_URL")?,
            base_url: required("DVSA_BASE_URL")?,
            server_port: optional("SERVER_PORT", 3000),
            cleanup_interval: optional("CLEANUP_INTERVAL", 60),
            http_timeout: optional("HTTP_TIMEOUT", 10),
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("missing required environment variable {}", name))
}

fn optional<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
