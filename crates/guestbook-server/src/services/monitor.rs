//! Background health monitor
//!
//! A single long-lived task, independent of request handling, that samples
//! store row count and store/cache liveness every tick and republishes them
//! as gauges. `tokio::time::interval` only fires the next tick after the
//! previous body returns, so slow ticks stretch the effective period
//! instead of overlapping.

use crate::metrics::{CACHE_UP, DB_ENTRIES_TOTAL, DB_UP};
use guestbook_core::{EntryStore, HealthSample, SnapshotCache};
use metrics::gauge;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

pub const MONITOR_INTERVAL: Duration = Duration::from_secs(15);

/// Spawn the monitor loop. Runs until process shutdown.
pub fn spawn(store: Arc<dyn EntryStore>, cache: Arc<dyn SnapshotCache>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(MONITOR_INTERVAL);
        loop {
            ticker.tick().await;
            let sample = sample(store.as_ref(), cache.as_ref()).await;
            publish(&sample);
        }
    })
}

/// Take one liveness sample. Query failures are folded into the sample
/// rather than propagated; a failed count leaves the gauge untouched for
/// this tick.
pub async fn sample(store: &dyn EntryStore, cache: &dyn SnapshotCache) -> HealthSample {
    let db_row_count = match store.count_entries().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("Row count sample failed: {}", e);
            None
        }
    };

    HealthSample {
        db_row_count,
        db_up: store.ping().await.is_ok(),
        cache_up: cache.ping().await.is_ok(),
    }
}

fn publish(sample: &HealthSample) {
    if let Some(count) = sample.db_row_count {
        gauge!(DB_ENTRIES_TOTAL).set(count as f64);
    }
    gauge!(DB_UP).set(if sample.db_up { 1.0 } else { 0.0 });
    gauge!(CACHE_UP).set(if sample.cache_up { 1.0 } else { 0.0 });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryCache, OfflineCache};
    use async_trait::async_trait;
    use guestbook_core::{Entry, GuestbookError};

    struct HealthyStore {
        rows: i64,
    }

    #[async_trait]
    impl EntryStore for HealthyStore {
        async fn insert_entry(&self, _: &str, _: &str) -> guestbook_core::Result<Entry> {
            unimplemented!("not used by the monitor")
        }
        async fn update_entry(&self, _: i32, _: &str, _: &str) -> guestbook_core::Result<bool> {
            unimplemented!("not used by the monitor")
        }
        async fn delete_entry(&self, _: i32) -> guestbook_core::Result<bool> {
            unimplemented!("not used by the monitor")
        }
        async fn recent_entries(&self, _: i64) -> guestbook_core::Result<Vec<Entry>> {
            unimplemented!("not used by the monitor")
        }
        async fn count_entries(&self) -> guestbook_core::Result<i64> {
            Ok(self.rows)
        }
        async fn ping(&self) -> guestbook_core::Result<()> {
            Ok(())
        }
    }

    struct DownStore;

    #[async_trait]
    impl EntryStore for DownStore {
        async fn insert_entry(&self, _: &str, _: &str) -> guestbook_core::Result<Entry> {
            Err(GuestbookError::Store("connection refused".into()))
        }
        async fn update_entry(&self, _: i32, _: &str, _: &str) -> guestbook_core::Result<bool> {
            Err(GuestbookError::Store("connection refused".into()))
        }
        async fn delete_entry(&self, _: i32) -> guestbook_core::Result<bool> {
            Err(GuestbookError::Store("connection refused".into()))
        }
        async fn recent_entries(&self, _: i64) -> guestbook_core::Result<Vec<Entry>> {
            Err(GuestbookError::Store("connection refused".into()))
        }
        async fn count_entries(&self) -> guestbook_core::Result<i64> {
            Err(GuestbookError::Store("connection refused".into()))
        }
        async fn ping(&self) -> guestbook_core::Result<()> {
            Err(GuestbookError::Store("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn sample_reports_healthy_backends() {
        let store = HealthyStore { rows: 42 };
        let cache = MemoryCache::new();

        let sample = sample(&store, &cache).await;
        assert_eq!(sample.db_row_count, Some(42));
        assert!(sample.db_up);
        assert!(sample.cache_up);
    }

    #[tokio::test]
    async fn sample_reports_cache_down_with_store_fields_intact() {
        let store = HealthyStore { rows: 7 };

        let sample = sample(&store, &OfflineCache).await;
        assert_eq!(sample.db_row_count, Some(7));
        assert!(sample.db_up);
        assert!(!sample.cache_up);
    }

    #[tokio::test]
    async fn sample_reports_store_down() {
        let cache = MemoryCache::new();

        let sample = sample(&DownStore, &cache).await;
        assert_eq!(sample.db_row_count, None);
        assert!(!sample.db_up);
        assert!(sample.cache_up);
    }
}
