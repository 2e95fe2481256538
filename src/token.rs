//! Token Manager
//!
//! Acquires and caches the OAuth2 client-credentials bearer token used for
//! vehicle API calls. The single token slot is guarded by a mutex held
//! across the exchange, so at most one exchange is ever in flight and
//! callers arriving during a refresh wait for it and reuse its result.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{LookupError, Result};

/// Safety margin subtracted from the advertised token lifetime so a token
/// is never presented upstream moments before it lapses.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

// == Access Token ==
/// An opaque bearer token with its locally-judged expiry instant.
#[derive(Debug, Clone)]
pub struct AccessToken {
    token: String,
    expires_at: Option<Instant>,
}

impl AccessToken {
    pub(crate) fn new(token: String, expires_at: Option<Instant>) -> Self {
        Self { token, expires_at }
    }

    /// Expired once past the recorded instant, or immediately when the
    /// token response carried no usable lifetime.
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(instant) => Instant::now() >= instant,
            None => true,
        }
    }

    /// The raw bearer token value.
    pub fn as_str(&self) -> &str {
        &self.token
    }
}

// == Token Manager ==
/// Holds at most one access token and refreshes it on demand.
pub struct TokenManager {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
    slot: Mutex<Option<AccessToken>>,
}

impl TokenManager {
    /// Creates a manager from the DVSA credentials in the configuration.
    /// No token is fetched until the first [`ensure_token`] call.
    ///
    /// [`ensure_token`]: TokenManager::ensure_token
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope_url.clone(),
            slot: Mutex::new(None),
        }
    }

    /// Returns the held token, exchanging credentials for a fresh one when
    /// none is held or the held token is past its expiry. Expiry is judged
    /// by the local clock before every use, never discovered reactively.
    ///
    /// # Errors
    /// - `UpstreamAuth` when the token endpoint answers non-2xx
    /// - `MalformedTokenResponse` when the payload lacks a string
    ///   `access_token`
    /// - `UpstreamTimeout` / `Transport` on transport failures
    ///
    /// The exchange is never retried here; failures surface to the caller.
    pub async fn ensure_token(&self) -> Result<AccessToken> {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.as_ref() {
            if !token.is_expired() {
                debug!("Reusing held access token");
                return Ok(token.clone());
            }
        }

        let token = self.exchange().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    async fn exchange(&self) -> Result<AccessToken> {
        info!("Requesting access token from {}", self.token_url);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(LookupError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::UpstreamAuth {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| LookupError::MalformedTokenResponse(e.to_string()))?;

        let token = payload
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                LookupError::MalformedTokenResponse("missing 'access_token' field".to_string())
            })?
            .to_string();

        // Without an advertised lifetime the token is conservatively judged
        // expired already: it serves this request and the next call refreshes.
        let expires_at = payload
            .get("expires_in")
            .and_then(Value::as_u64)
            .map(|secs| Instant::now() + Duration::from_secs(secs).saturating_sub(EXPIRY_MARGIN));

        Ok(AccessToken::new(token, expires_at))
    }
}
