//! Result Cache Module
//!
//! Maps normalized registrations to vehicle records with a fixed TTL.
//! Expiry is lazy: an expired entry reads as absent and is only removed by
//! an overwriting put or the background sweep.

pub mod entry;
pub mod stats;
pub mod store;


pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::{VehicleCache, CACHE_TTL};
