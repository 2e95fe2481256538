//! Cache Entry Module
//!
//! A vehicle record together with the timestamp it was cached at.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::VehicleRecord;

// == Cache Entry ==
/// A cached lookup result.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached record
    pub record: VehicleRecord,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
}

impl CacheEntry {
    /// Creates a new entry stamped with the current time.
    pub fn new(record: VehicleRecord) -> Self {
        Self {
            record,
            created_at: current_timestamp_ms(),
        }
    }

    /// Checks whether the entry's age has reached the given TTL.
    ///
    /// Boundary condition: the entry counts as expired at the exact instant
    /// its age equals the TTL.
    pub fn is_expired(&self, ttl_ms: u64) -> bool {
        current_timestamp_ms() >= self.created_at.saturating_add(ttl_ms)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
