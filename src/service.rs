//! Vehicle Lookup Proxy
//!
//! Orchestrates a lookup: normalize, consult the cache, and on a miss
//! ensure a token, call upstream, map and cache the result. Failures
//! propagate untouched and never leave a partial cache write.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::cache::VehicleCache;
use crate::config::Config;
use crate::error::Result;
use crate::mapper;
use crate::models::VehicleRecord;
use crate::registration;
use crate::token::TokenManager;
use crate::upstream::VehicleApiClient;

// == Vehicle Lookup Proxy ==
/// Composes the normalizer, cache, token manager and upstream client.
pub struct VehicleLookupProxy {
    cache: VehicleCache,
    tokens: TokenManager,
    upstream: VehicleApiClient,
}

impl VehicleLookupProxy {
    /// Composes a proxy from already-built parts. Used by tests that need
    /// a shortened cache TTL or stubbed endpoints.
    pub fn new(cache: VehicleCache, tokens: TokenManager, upstream: VehicleApiClient) -> Self {
        Self {
            cache,
            tokens,
            upstream,
        }
    }

    /// Builds the proxy and its shared HTTP client from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout))
            .build()?;

        Ok(Self::new(
            VehicleCache::new(),
            TokenManager::new(client.clone(), config),
            VehicleApiClient::new(client, config.base_url.clone(), config.api_key.clone()),
        ))
    }

    /// Looks up vehicle details for a raw registration string.
    ///
    /// A cache hit answers without touching the token manager or the
    /// network. A miss runs token -> fetch -> map and caches the mapped
    /// record before returning it. Two concurrent misses for the same key
    /// may both reach upstream; the lookup is read-only so the duplicate
    /// call is harmless and last write wins in the cache.
    pub async fn get_vehicle_details(&self, raw_registration: &str) -> Result<VehicleRecord> {
        let key = registration::normalize(raw_registration)?;

        if let Some(record) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(record);
        }

        debug!("Cache miss for {}", key);
        let token = self.tokens.ensure_token().await?;
        let doc = self.upstream.fetch(&key, &token).await?;
        let record = mapper::map(&doc)?;

        self.cache.put(key.clone(), record.clone());
        info!("Cached vehicle details for {}", key);

        Ok(record)
    }

    /// The underlying result cache, for stats reporting and the sweep task.
    pub fn cache(&self) -> &VehicleCache {
        &self.cache
    }
}
