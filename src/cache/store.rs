//! Cache Store Module
//!
//! Concurrent registration -> record map with a fixed TTL.
//! Reads take a shared lock so lookups for different keys never block each
//! other; hit/miss counters are plain atomics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use crate::cache::{CacheEntry, CacheStats};
use crate::models::VehicleRecord;

/// Fixed time-to-live for cached lookup results.
pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

// == Vehicle Cache ==
/// TTL-bounded cache of lookup results keyed by normalized registration.
#[derive(Debug)]
pub struct VehicleCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    ttl_ms: u64,
}

impl Default for VehicleCache {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleCache {
    // == Constructor ==
    /// Creates a cache with the standard 30 minute TTL.
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    /// Creates a cache with a custom TTL. Production code uses [`CACHE_TTL`];
    /// this mainly lets tests exercise expiry without waiting.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            ttl_ms: ttl.as_millis() as u64,
        }
    }

    // == Get ==
    /// Returns the cached record if present and younger than the TTL.
    ///
    /// An expired entry behaves as absent but is not removed here; a later
    /// `put` overwrites it and the background sweep reclaims it.
    pub fn get(&self, key: &str) -> Option<VehicleRecord> {
        let entries = self.entries.read();
        match entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl_ms) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.record.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    // == Put ==
    /// Stores a record with a fresh timestamp, unconditionally replacing
    /// any prior entry for the key.
    pub fn put(&self, key: String, record: VehicleRecord) {
        self.entries.write().insert(key, CacheEntry::new(record));
    }

    // == Sweep Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(self.ttl_ms));
        before - entries.len()
    }

    // == Stats ==
    /// Returns a snapshot of hit/miss counters and the entry count.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().len(),
        }
    }

    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Inserts an entry with an explicit timestamp, for expiry tests.
    #[cfg(test)]
    pub(crate) fn insert_entry(&self, key: String, entry: CacheEntry) {
        self.entries.write().insert(key, entry);
    }
}
