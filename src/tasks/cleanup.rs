//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.
//! Correctness never depends on it - expired entries already read as
//! absent - it only reclaims the memory they occupy.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::service::VehicleLookupProxy;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// # Arguments
/// * `proxy` - shared lookup proxy whose cache is swept
/// * `cleanup_interval_secs` - interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(
    proxy: Arc<VehicleLookupProxy>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = proxy.cache().sweep_expired();

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
