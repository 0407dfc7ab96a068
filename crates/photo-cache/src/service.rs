//! Fetch-through orchestration over the store and coalescer

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::coalescer::{FetchCoalescer, FetchOutcome, Flight};
use crate::error::{CacheError, Result};
use crate::store::PhotoStore;
use crate::types::{CacheConfig, CacheStats, CacheStatus, PhotoEntry};

/// Longest accepted theme key, in bytes
const MAX_KEY_BYTES: usize = 200;

/// A freshly fetched upstream photo, before it becomes a cache entry
#[derive(Debug, Clone)]
pub struct FetchedPhoto {
    pub data: Bytes,
    pub content_type: String,
}

/// Upstream photo source, injected into the service.
///
/// The implementation owns everything about talking upstream, including any
/// retry policy; the cache layer never retries.
#[async_trait]
pub trait PhotoFetcher: Send + Sync {
    async fn fetch(&self, theme: &str) -> Result<FetchedPhoto>;
}

/// Fetch-through photo cache.
///
/// Constructed once at startup and shared with the request layer; holds the
/// store, the coalescer, and the injected fetcher. No store lock is ever
/// held across the upstream call, so hits for other keys never wait on an
/// in-flight fetch.
pub struct PhotoCacheService {
    store: Arc<PhotoStore>,
    coalescer: Arc<FetchCoalescer>,
    fetcher: Arc<dyn PhotoFetcher>,
    config: CacheConfig,
}

impl PhotoCacheService {
    pub fn new(fetcher: Arc<dyn PhotoFetcher>, config: CacheConfig) -> Self {
        Self {
            store: Arc::new(PhotoStore::new(config.mode)),
            coalescer: Arc::new(FetchCoalescer::new()),
            fetcher,
            config,
        }
    }

    /// The TTL actually applied to entries
    pub fn ttl_secs(&self) -> u64 {
        self.config.effective_ttl_secs()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.stats().await
    }

    /// Return a fresh cached photo for `theme`, fetching through to the
    /// upstream on a miss or stale entry. Concurrent misses for the same key
    /// coalesce onto one upstream call.
    pub async fn get_or_fetch(&self, theme: &str) -> Result<(PhotoEntry, CacheStatus)> {
        validate_theme(theme)?;

        if let Some(entry) = self.store.lookup(theme).await {
            if entry.is_fresh(Utc::now(), self.ttl_secs()) {
                self.store.record_hit();
                debug!(theme, "cache hit");
                return Ok((entry, CacheStatus::Hit));
            }
            debug!(theme, "cache entry expired");
        }
        self.store.record_miss();

        let flight_key = self.store.flight_key(theme).to_string();
        match self.coalescer.acquire(&flight_key).await {
            Flight::Leader => {
                let entry = self.lead_fetch(theme, &flight_key).await?;
                Ok((entry, CacheStatus::Miss))
            }
            Flight::Follower(rx) => {
                debug!(theme, "awaiting in-flight fetch");
                let entry = self.await_leader(rx).await?;
                Ok((entry, CacheStatus::Coalesced))
            }
        }
    }

    /// Leader side of a fetch cycle: fetch, store, resolve.
    ///
    /// The cycle runs on a detached task that the leader awaits. A leader
    /// whose request is dropped mid-fetch (client disconnect) leaves the
    /// task running, so the flight still resolves for its followers and the
    /// in-flight marker always clears.
    async fn lead_fetch(&self, theme: &str, flight_key: &str) -> Result<PhotoEntry> {
        let store = Arc::clone(&self.store);
        let coalescer = Arc::clone(&self.coalescer);
        let fetcher = Arc::clone(&self.fetcher);
        let ttl_secs = self.ttl_secs();
        let theme = theme.to_string();
        let key = flight_key.to_string();

        let flight = tokio::spawn(async move {
            // A previous leader may have resolved between this caller's miss
            // and its acquire; serve that entry instead of fetching again.
            if let Some(entry) = store.lookup(&theme).await {
                if entry.is_fresh(Utc::now(), ttl_secs) {
                    coalescer.resolve(&key, Ok(entry.clone())).await;
                    return Ok(entry);
                }
            }

            let outcome: FetchOutcome = match fetcher.fetch(&theme).await {
                Ok(photo) => {
                    let entry = PhotoEntry::new(photo.data, photo.content_type);
                    store.put(&theme, entry.clone()).await;
                    debug!(theme = %theme, size = entry.data.len(), "stored fetched photo");
                    Ok(entry)
                }
                Err(e) => {
                    // The store keeps whatever it had; a stale entry stays stale
                    warn!(theme = %theme, error = %e, "upstream fetch failed");
                    Err(CacheError::FetchFailed(e.to_string()))
                }
            };

            coalescer.resolve(&key, outcome.clone()).await;
            outcome
        });

        match flight.await {
            Ok(outcome) => outcome,
            Err(e) => {
                // The task can only die before resolving (resolve is its
                // last step); clear the marker so the key recovers
                warn!(key = %flight_key, error = %e, "fetch task died");
                let outcome = Err(CacheError::FetchFailed(format!("fetch task failed: {e}")));
                self.coalescer.resolve(flight_key, outcome.clone()).await;
                outcome
            }
        }
    }

    /// Follower side: await the leader's broadcast under the wait bound.
    ///
    /// Dropping out early never cancels the leader's fetch; other followers
    /// may still depend on it.
    async fn await_leader(&self, mut rx: broadcast::Receiver<FetchOutcome>) -> Result<PhotoEntry> {
        let wait = Duration::from_secs(self.config.follower_wait_secs);
        match tokio::time::timeout(wait, rx.recv()).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(CacheError::FetchFailed(
                "in-flight fetch ended without a result".to_string(),
            )),
            Err(_) => Err(CacheError::Timeout),
        }
    }
}

fn validate_theme(theme: &str) -> Result<()> {
    if theme.is_empty() {
        return Err(CacheError::InvalidKey("empty theme".to_string()));
    }
    if theme.len() > MAX_KEY_BYTES {
        return Err(CacheError::InvalidKey(format!(
            "theme exceeds {MAX_KEY_BYTES} bytes"
        )));
    }
    Ok(())
}
