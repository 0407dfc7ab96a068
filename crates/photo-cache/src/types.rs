//! Cache types

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A cached photo: payload bytes, content type, and creation time.
///
/// Immutable once constructed; a newer fetch replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEntry {
    pub data: Bytes,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

impl PhotoEntry {
    /// Create an entry stamped with the current time
    pub fn new(data: Bytes, content_type: impl Into<String>) -> Self {
        Self {
            data,
            content_type: content_type.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether the entry is still within its TTL at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl_secs: u64) -> bool {
        now.signed_duration_since(self.created_at) < Duration::seconds(ttl_secs as i64)
    }
}

/// Which store variant the service runs with, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// One independently expiring entry per theme key
    Keyed,
    /// A single entry shared across all keys, last write wins
    Singleton,
}

impl CacheMode {
    /// The TTL floor observed for deployments of this mode
    pub fn default_min_ttl_secs(self) -> u64 {
        match self {
            CacheMode::Keyed => 600,
            CacheMode::Singleton => 90,
        }
    }
}

impl std::str::FromStr for CacheMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "keyed" => Ok(CacheMode::Keyed),
            "singleton" => Ok(CacheMode::Singleton),
            other => Err(format!("unknown cache mode: {other}")),
        }
    }
}

/// Cache behavior knobs, set once at startup
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub mode: CacheMode,
    /// Requested TTL; clamped to `min_ttl_secs` when evaluated
    pub ttl_secs: u64,
    /// TTL floor; defaults per mode, overridable
    pub min_ttl_secs: u64,
    /// Upper bound on how long a coalesced waiter blocks on the leader
    pub follower_wait_secs: u64,
}

impl CacheConfig {
    pub fn new(mode: CacheMode, ttl_secs: u64) -> Self {
        Self {
            mode,
            ttl_secs,
            min_ttl_secs: mode.default_min_ttl_secs(),
            follower_wait_secs: 30,
        }
    }

    pub fn with_min_ttl_secs(mut self, min_ttl_secs: u64) -> Self {
        self.min_ttl_secs = min_ttl_secs;
        self
    }

    pub fn with_follower_wait_secs(mut self, follower_wait_secs: u64) -> Self {
        self.follower_wait_secs = follower_wait_secs;
        self
    }

    /// The TTL actually applied: the requested value, floor-clamped
    pub fn effective_ttl_secs(&self) -> u64 {
        self.ttl_secs.max(self.min_ttl_secs)
    }
}

/// Statistics about the cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// How a request was answered, reported back to the HTTP layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from a fresh cached entry
    Hit,
    /// This caller performed the upstream fetch
    Miss,
    /// Served from another caller's in-flight fetch
    Coalesced,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Coalesced => "COALESCED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_fresh_within_ttl() {
        let entry = PhotoEntry::new(Bytes::from_static(b"img"), "image/jpeg");
        assert!(entry.is_fresh(Utc::now(), 90));
    }

    #[test]
    fn test_entry_stale_past_ttl() {
        let mut entry = PhotoEntry::new(Bytes::from_static(b"img"), "image/jpeg");
        entry.created_at = Utc::now() - Duration::seconds(95);
        assert!(!entry.is_fresh(Utc::now(), 90));
    }

    #[test]
    fn test_entry_stale_exactly_at_ttl() {
        let now = Utc::now();
        let mut entry = PhotoEntry::new(Bytes::from_static(b"img"), "image/jpeg");
        entry.created_at = now - Duration::seconds(90);
        // age == ttl counts as expired
        assert!(!entry.is_fresh(now, 90));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("keyed".parse::<CacheMode>().unwrap(), CacheMode::Keyed);
        assert_eq!("singleton".parse::<CacheMode>().unwrap(), CacheMode::Singleton);
        assert!("lru".parse::<CacheMode>().is_err());
    }

    #[test]
    fn test_ttl_floor_clamp() {
        let config = CacheConfig::new(CacheMode::Keyed, 60);
        assert_eq!(config.effective_ttl_secs(), 600);

        let config = CacheConfig::new(CacheMode::Singleton, 60);
        assert_eq!(config.effective_ttl_secs(), 90);

        let config = CacheConfig::new(CacheMode::Keyed, 1200);
        assert_eq!(config.effective_ttl_secs(), 1200);
    }

    #[test]
    fn test_ttl_floor_override() {
        let config = CacheConfig::new(CacheMode::Keyed, 60).with_min_ttl_secs(30);
        assert_eq!(config.effective_ttl_secs(), 60);
    }

    #[test]
    fn test_cache_status_header_values() {
        assert_eq!(CacheStatus::Hit.as_str(), "HIT");
        assert_eq!(CacheStatus::Miss.as_str(), "MISS");
        assert_eq!(CacheStatus::Coalesced.as_str(), "COALESCED");
    }
}
