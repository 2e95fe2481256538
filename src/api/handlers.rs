//! API Handlers
//!
//! HTTP request handlers for the lookup proxy endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::Result;
use crate::models::{HealthResponse, StatsResponse, VehicleRecord};
use crate::service::VehicleLookupProxy;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The lookup proxy; internally synchronized, shared by reference
    pub proxy: Arc<VehicleLookupProxy>,
}

impl AppState {
    /// Creates a new AppState wrapping the given proxy.
    pub fn new(proxy: VehicleLookupProxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(VehicleLookupProxy::from_config(config)?))
    }
}

/// Handler for GET /vehicles/:registration
///
/// Looks up vehicle details by registration plate. The error kind picks the
/// response status: 400 for bad input, 404 when the registration is unknown
/// upstream, 502/504 for upstream faults, 500 for contract violations.
pub async fn vehicle_handler(
    State(state): State<AppState>,
    Path(registration): Path<String>,
) -> Result<Json<VehicleRecord>> {
    let record = state.proxy.get_vehicle_details(&registration).await?;
    Ok(Json(record))
}

/// Handler for GET /stats
///
/// Returns cache hit/miss counters and the current entry count.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.proxy.cache().stats();
    Json(StatsResponse::from_stats(&stats))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
