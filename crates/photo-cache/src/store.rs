//! In-memory photo store, keyed or singleton

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::types::{CacheMode, CacheStats, PhotoEntry};

/// The single coalescing slot used in singleton mode
const SINGLETON_SLOT: &str = "";

enum Slots {
    Keyed(RwLock<HashMap<String, PhotoEntry>>),
    Singleton(RwLock<Option<PhotoEntry>>),
}

/// Mapping from theme key to cached entry.
///
/// The variant is fixed at construction and never mixed within one instance.
/// Lookups do not evaluate freshness; stale entries stay in place until
/// overwritten and the caller treats them as misses.
pub struct PhotoStore {
    slots: Slots,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PhotoStore {
    pub fn new(mode: CacheMode) -> Self {
        let slots = match mode {
            CacheMode::Keyed => Slots::Keyed(RwLock::new(HashMap::new())),
            CacheMode::Singleton => Slots::Singleton(RwLock::new(None)),
        };
        Self {
            slots,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the entry for `key`, if any.
    ///
    /// In singleton mode the sole entry answers any key.
    pub async fn lookup(&self, key: &str) -> Option<PhotoEntry> {
        match &self.slots {
            Slots::Keyed(map) => map.read().await.get(key).cloned(),
            Slots::Singleton(slot) => slot.read().await.clone(),
        }
    }

    /// Store or replace the entry for `key`.
    ///
    /// In singleton mode any key overwrites the single slot: last write
    /// wins, ignoring key identity.
    pub async fn put(&self, key: &str, entry: PhotoEntry) {
        match &self.slots {
            Slots::Keyed(map) => {
                map.write().await.insert(key.to_string(), entry);
            }
            Slots::Singleton(slot) => {
                *slot.write().await = Some(entry);
            }
        }
    }

    /// The coalescing slot for a request key: the key itself in keyed mode,
    /// one shared slot in singleton mode.
    pub fn flight_key<'a>(&self, key: &'a str) -> &'a str {
        match &self.slots {
            Slots::Keyed(_) => key,
            Slots::Singleton(_) => SINGLETON_SLOT,
        }
    }

    pub async fn len(&self) -> usize {
        match &self.slots {
            Slots::Keyed(map) => map.read().await.len(),
            Slots::Singleton(slot) => usize::from(slot.read().await.is_some()),
        }
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len().await,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn entry(data: &'static [u8]) -> PhotoEntry {
        PhotoEntry::new(Bytes::from_static(data), "image/jpeg")
    }

    #[tokio::test]
    async fn test_keyed_put_and_lookup() {
        let store = PhotoStore::new(CacheMode::Keyed);
        assert!(store.lookup("nature").await.is_none());

        store.put("nature", entry(b"forest")).await;
        let found = store.lookup("nature").await.unwrap();
        assert_eq!(found.data, Bytes::from_static(b"forest"));
        assert!(store.lookup("ocean").await.is_none());
    }

    #[tokio::test]
    async fn test_keyed_put_replaces() {
        let store = PhotoStore::new(CacheMode::Keyed);
        store.put("nature", entry(b"old")).await;
        store.put("nature", entry(b"new")).await;

        assert_eq!(store.len().await, 1);
        let found = store.lookup("nature").await.unwrap();
        assert_eq!(found.data, Bytes::from_static(b"new"));
    }

    #[tokio::test]
    async fn test_keyed_keys_are_isolated() {
        let store = PhotoStore::new(CacheMode::Keyed);
        store.put("a", entry(b"aaa")).await;
        store.put("b", entry(b"bbb")).await;

        assert_eq!(store.len().await, 2);
        assert_eq!(store.lookup("a").await.unwrap().data, Bytes::from_static(b"aaa"));
        assert_eq!(store.lookup("b").await.unwrap().data, Bytes::from_static(b"bbb"));
    }

    #[tokio::test]
    async fn test_singleton_lookup_ignores_key() {
        let store = PhotoStore::new(CacheMode::Singleton);
        assert!(store.lookup("beach").await.is_none());

        store.put("beach", entry(b"sand")).await;
        assert_eq!(
            store.lookup("mountain").await.unwrap().data,
            Bytes::from_static(b"sand")
        );
    }

    #[tokio::test]
    async fn test_singleton_last_write_wins() {
        let store = PhotoStore::new(CacheMode::Singleton);
        store.put("beach", entry(b"sand")).await;
        store.put("mountain", entry(b"rock")).await;

        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.lookup("beach").await.unwrap().data,
            Bytes::from_static(b"rock")
        );
    }

    #[tokio::test]
    async fn test_flight_key_per_mode() {
        let keyed = PhotoStore::new(CacheMode::Keyed);
        assert_eq!(keyed.flight_key("nature"), "nature");

        let singleton = PhotoStore::new(CacheMode::Singleton);
        assert_eq!(singleton.flight_key("nature"), "");
        assert_eq!(singleton.flight_key("ocean"), singleton.flight_key("nature"));
    }

    #[tokio::test]
    async fn test_stats_counters() {
        let store = PhotoStore::new(CacheMode::Keyed);
        store.record_miss();
        store.record_hit();
        store.record_hit();
        store.put("nature", entry(b"forest")).await;

        let stats = store.stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }
}
