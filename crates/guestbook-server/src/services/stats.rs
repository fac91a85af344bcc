//! Advisory statistics ledger

use guestbook_core::SnapshotCache;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache key for the advisory live-entry counter.
///
/// The counter is incremented on create and decremented on delete, so it
/// tracks the number of live entries, not cumulative creations. It resets
/// when the cache restarts and silently misses updates while the cache is
/// down; the store's `COUNT(*)` remains the ground truth.
pub const LIVE_TOTAL_KEY: &str = "stats:live_total";

/// Best-effort counters kept in the cache.
///
/// Updates and reads are advisory: a cache failure is logged and otherwise
/// ignored, never surfaced to the caller.
pub struct StatsLedger {
    cache: Arc<dyn SnapshotCache>,
}

impl StatsLedger {
    pub fn new(cache: Arc<dyn SnapshotCache>) -> Self {
        Self { cache }
    }

    /// Add `delta` (may be negative) to a counter, best-effort.
    pub async fn bump(&self, key: &str, delta: i64) {
        if let Err(e) = self.cache.incr(key, delta).await {
            warn!("Advisory counter update dropped for {}: {}", key, e);
        }
    }

    /// Read a counter; `None` when absent or the cache is unreachable.
    pub async fn read(&self, key: &str) -> Option<i64> {
        match self.cache.read_i64(key).await {
            Ok(value) => value,
            Err(e) => {
                debug!("Advisory counter read failed for {}: {}", key, e);
                None
            }
        }
    }
}
