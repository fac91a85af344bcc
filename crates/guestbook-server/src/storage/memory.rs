//! In-memory cache using DashMap (stands in for Redis in tests and local
//! development)

use async_trait::async_trait;
use dashmap::DashMap;
use guestbook_core::{GuestbookError, Result, SnapshotCache};
use std::time::{Duration, Instant};

/// Simple in-memory cache with TTL support.
///
/// Expired entries are dropped lazily on read. Counter keys are stored as
/// decimal strings, mirroring how Redis represents integers.
#[derive(Default)]
pub struct MemoryCache {
    data: DashMap<String, CacheEntry>,
}

struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn expired(&self) -> bool {
        self.expires_at.map(|at| Instant::now() > at).unwrap_or(false)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_live(&self, key: &str) -> Option<Vec<u8>> {
        let entry = self.data.get(key)?;
        if entry.expired() {
            drop(entry);
            self.data.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }
}

#[async_trait]
impl SnapshotCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get_live(key))
    }

    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.data.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    async fn incr(&self, key: &str, delta: i64) -> Result<i64> {
        let mut entry = self.data.entry(key.to_string()).or_insert(CacheEntry {
            value: b"0".to_vec(),
            expires_at: None,
        });

        let current: i64 = std::str::from_utf8(&entry.value)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| GuestbookError::Cache(format!("key {} is not an integer", key)))?;
        let next = current + delta;
        entry.value = next.to_string().into_bytes();

        Ok(next)
    }

    async fn read_i64(&self, key: &str) -> Result<Option<i64>> {
        match self.get_live(key) {
            Some(bytes) => {
                let n = std::str::from_utf8(&bytes)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        GuestbookError::Cache(format!("key {} is not an integer", key))
                    })?;
                Ok(Some(n))
            }
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_basic_operations() {
        let cache = MemoryCache::new();

        cache
            .set_with_ttl("key1", vec![1, 2, 3], Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("key1").await.unwrap(), Some(vec![1, 2, 3]));

        assert_eq!(cache.get("nonexistent").await.unwrap(), None);

        cache.delete("key1").await.unwrap();
        assert_eq!(cache.get("key1").await.unwrap(), None);

        // Deleting an absent key is a no-op.
        cache.delete("key1").await.unwrap();
    }

    #[tokio::test]
    async fn test_ttl_expiry_reads_as_miss() {
        let cache = MemoryCache::new();

        cache
            .set_with_ttl("key1", vec![1, 2, 3], Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(cache.get("key1").await.unwrap(), Some(vec![1, 2, 3]));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_counter_increments() {
        let cache = MemoryCache::new();

        assert_eq!(cache.incr("counter", 5).await.unwrap(), 5);
        assert_eq!(cache.incr("counter", 3).await.unwrap(), 8);
        assert_eq!(cache.incr("counter", -8).await.unwrap(), 0);
        assert_eq!(cache.read_i64("counter").await.unwrap(), Some(0));
        assert_eq!(cache.read_i64("absent").await.unwrap(), None);
    }
}
