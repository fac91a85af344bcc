//! Entry service: cache-aside reads and write-invalidate mutations
//!
//! Reads check the cached snapshot first and fall back to the store on a
//! miss, repopulating the snapshot with a TTL. Writes go to the store
//! first; only after the store commits is the snapshot key deleted and the
//! advisory counter bumped. Cache failures on any of these side paths are
//! logged and swallowed, so the service stays available whenever the store
//! is.

use crate::metrics::{CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL};
use crate::services::stats::{StatsLedger, LIVE_TOTAL_KEY};
use guestbook_core::{Entry, EntryStore, GuestbookError, Result, SnapshotCache};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed cache key for the serialized recent-entries snapshot.
pub const SNAPSHOT_KEY: &str = "entries:all";

/// Snapshot TTL; re-bounds staleness even when an invalidation is lost.
pub const SNAPSHOT_TTL: Duration = Duration::from_secs(300);

/// Maximum number of entries in the cached list view.
pub const RECENT_LIMIT: i64 = 100;

const MAX_NAME_CHARS: usize = 100;

/// Whether a list read was served from the cache or the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheStatus::Hit => write!(f, "HIT"),
            CacheStatus::Miss => write!(f, "MISS"),
        }
    }
}

pub struct EntryService {
    store: Arc<dyn EntryStore>,
    cache: Arc<dyn SnapshotCache>,
    ledger: Arc<StatsLedger>,
}

impl EntryService {
    pub fn new(
        store: Arc<dyn EntryStore>,
        cache: Arc<dyn SnapshotCache>,
        ledger: Arc<StatsLedger>,
    ) -> Self {
        Self {
            store,
            cache,
            ledger,
        }
    }

    /// List the most recent entries, newest first.
    ///
    /// Never fails because of the cache: any cache error is treated as a
    /// miss and the store result is returned instead.
    pub async fn list_recent(&self) -> Result<(Vec<Entry>, CacheStatus)> {
        match self.cache.get(SNAPSHOT_KEY).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<Entry>>(&bytes) {
                Ok(entries) => {
                    counter!(CACHE_HITS_TOTAL).increment(1);
                    debug!("Cache hit for {}", SNAPSHOT_KEY);
                    return Ok((entries, CacheStatus::Hit));
                }
                Err(e) => warn!("Discarding undecodable snapshot: {}", e),
            },
            Ok(None) => {}
            Err(e) => warn!("Cache read failed, falling back to store: {}", e),
        }

        counter!(CACHE_MISSES_TOTAL).increment(1);
        let entries = self.store.recent_entries(RECENT_LIMIT).await?;

        // Repopulate best-effort; concurrent misses may each rewrite the
        // key and the last writer wins.
        match serde_json::to_vec(&entries) {
            Ok(bytes) => {
                if let Err(e) = self
                    .cache
                    .set_with_ttl(SNAPSHOT_KEY, bytes, SNAPSHOT_TTL)
                    .await
                {
                    warn!("Snapshot repopulation dropped: {}", e);
                }
            }
            Err(e) => warn!("Snapshot serialization failed: {}", e),
        }

        Ok((entries, CacheStatus::Miss))
    }

    /// Create an entry; the store assigns `id` and `created_at`.
    pub async fn create(&self, name: &str, message: &str) -> Result<Entry> {
        validate(name, message)?;

        let entry = self.store.insert_entry(name, message).await?;

        self.invalidate_snapshot().await;
        self.ledger.bump(LIVE_TOTAL_KEY, 1).await;

        Ok(entry)
    }

    /// Update an entry's name and message.
    pub async fn update(&self, id: i32, name: &str, message: &str) -> Result<()> {
        validate(name, message)?;

        if !self.store.update_entry(id, name, message).await? {
            return Err(GuestbookError::NotFound(id));
        }

        self.invalidate_snapshot().await;
        Ok(())
    }

    /// Delete an entry.
    pub async fn delete(&self, id: i32) -> Result<()> {
        if !self.store.delete_entry(id).await? {
            return Err(GuestbookError::NotFound(id));
        }

        self.invalidate_snapshot().await;
        self.ledger.bump(LIVE_TOTAL_KEY, -1).await;
        Ok(())
    }

    /// Invalidation is a plain delete of the shared key; deleting an
    /// absent key is a no-op, so concurrent writers need no coordination.
    async fn invalidate_snapshot(&self) {
        if let Err(e) = self.cache.delete(SNAPSHOT_KEY).await {
            warn!("Cache invalidation dropped: {}", e);
        }
    }
}

fn validate(name: &str, message: &str) -> Result<()> {
    if name.is_empty() {
        return Err(GuestbookError::Validation("name is required".into()));
    }
    if message.is_empty() {
        return Err(GuestbookError::Validation("message is required".into()));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(GuestbookError::Validation(format!(
            "name must be at most {} characters",
            MAX_NAME_CHARS
        )));
    }
    Ok(())
}
