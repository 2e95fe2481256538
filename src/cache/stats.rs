//! Cache Statistics Module
//!
//! Point-in-time counters snapshot for the stats endpoint.

// == Cache Stats ==
/// Hit/miss counters and current entry count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses (including expired reads)
    pub misses: u64,
    /// Current number of cached registrations
    pub entries: usize,
}
