//! Single-flight tracking for upstream fetches
//!
//! At most one upstream fetch is in flight per key at any instant. The first
//! caller for a stale or missing key becomes the leader and performs the
//! fetch; callers arriving while it is outstanding become followers and
//! share the leader's eventual outcome, success or failure.

use std::collections::HashMap;

use tokio::sync::{broadcast, Mutex};

use crate::error::CacheError;
use crate::types::PhotoEntry;

/// The shared result of one fetch cycle
pub type FetchOutcome = Result<PhotoEntry, CacheError>;

/// What `acquire` hands back to a caller
pub enum Flight {
    /// First caller for the key; must fetch and then `resolve` exactly once
    Leader,
    /// A fetch is already outstanding; await the leader's broadcast
    Follower(broadcast::Receiver<FetchOutcome>),
}

/// Per-key in-flight fetch tracker
pub struct FetchCoalescer {
    flights: Mutex<HashMap<String, broadcast::Sender<FetchOutcome>>>,
}

impl FetchCoalescer {
    pub fn new() -> Self {
        Self {
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Join the fetch cycle for `key`, as leader or follower.
    ///
    /// Followers subscribe while the map lock is held, so a resolution can
    /// never slip between the lookup and the subscription.
    pub async fn acquire(&self, key: &str) -> Flight {
        let mut flights = self.flights.lock().await;
        if let Some(tx) = flights.get(key) {
            return Flight::Follower(tx.subscribe());
        }

        // Single message per cycle, so capacity 1 never lags
        let (tx, _rx) = broadcast::channel(1);
        flights.insert(key.to_string(), tx);
        Flight::Leader
    }

    /// Clear the in-flight marker for `key` and fan the outcome out to every
    /// follower. The next request for the key starts a fresh leader cycle.
    pub async fn resolve(&self, key: &str, outcome: FetchOutcome) {
        let tx = self.flights.lock().await.remove(key);
        if let Some(tx) = tx {
            // Send fails only when no follower subscribed
            let _ = tx.send(outcome);
        }
    }

    pub async fn in_flight(&self) -> usize {
        self.flights.lock().await.len()
    }
}

impl Default for FetchCoalescer {
    fn default() -> Self {
        Self::new()
    }
}
