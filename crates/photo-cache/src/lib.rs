//! In-memory, theme-keyed photo cache with TTL expiry and single-flight
//! fetch coalescing
//!
//! Provides a fetch-through cache for a slow, rate-limited upstream photo
//! source: fresh entries are served directly, misses and expired entries
//! fetch through exactly once per key no matter how many callers arrive
//! concurrently. Runs either keyed (one entry per theme) or singleton (one
//! entry total, last write wins).

mod coalescer;
mod error;
mod service;
mod store;
mod types;

pub use coalescer::{FetchCoalescer, FetchOutcome, Flight};
pub use error::{CacheError, Result};
pub use service::{FetchedPhoto, PhotoCacheService, PhotoFetcher};
pub use store::PhotoStore;
pub use types::{CacheConfig, CacheMode, CacheStats, CacheStatus, PhotoEntry};
