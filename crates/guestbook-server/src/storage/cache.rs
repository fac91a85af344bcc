//! Redis cache layer

use async_trait::async_trait;
use guestbook_core::{GuestbookError, Result, SnapshotCache};
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use std::time::Duration;

/// Redis-backed snapshot cache.
///
/// Uses a `ConnectionManager` so all callers share one multiplexed
/// connection with automatic reconnection; cloning the manager is cheap.
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis at `url` (e.g. "redis://localhost:6379").
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url)
            .map_err(|e| GuestbookError::Cache(format!("invalid Redis URL: {}", e)))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| GuestbookError::Cache(format!("Redis connect failed: {}", e)))?;

        Ok(Self { manager })
    }
}

#[async_trait]
impl SnapshotCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.manager.clone();
        conn.get(key)
            .await
            .map_err(|e| GuestbookError::Cache(format!("Redis GET failed: {}", e)))
    }

    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs())
            .await
            .map_err(|e| GuestbookError::Cache(format!("Redis SETEX failed: {}", e)))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        // DEL of an absent key returns 0, which is still success.
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| GuestbookError::Cache(format!("Redis DEL failed: {}", e)))?;
        Ok(())
    }

    async fn incr(&self, key: &str, delta: i64) -> Result<i64> {
        let mut conn = self.manager.clone();
        conn.incr(key, delta)
            .await
            .map_err(|e| GuestbookError::Cache(format!("Redis INCRBY failed: {}", e)))
    }

    async fn read_i64(&self, key: &str) -> Result<Option<i64>> {
        let mut conn = self.manager.clone();
        conn.get(key)
            .await
            .map_err(|e| GuestbookError::Cache(format!("Redis GET failed: {}", e)))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| GuestbookError::Cache(format!("Redis PING failed: {}", e)))?;
        Ok(())
    }
}

/// Cache stub used when Redis is unreachable at startup.
///
/// Every operation reports unavailability, so reads degrade to store reads
/// and the health surface reports the cache as down.
pub struct OfflineCache;

#[async_trait]
impl SnapshotCache for OfflineCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(GuestbookError::Cache("cache offline".into()))
    }

    async fn set_with_ttl(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<()> {
        Err(GuestbookError::Cache("cache offline".into()))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(GuestbookError::Cache("cache offline".into()))
    }

    async fn incr(&self, _key: &str, _delta: i64) -> Result<i64> {
        Err(GuestbookError::Cache("cache offline".into()))
    }

    async fn read_i64(&self, _key: &str) -> Result<Option<i64>> {
        Err(GuestbookError::Cache("cache offline".into()))
    }

    async fn ping(&self) -> Result<()> {
        Err(GuestbookError::Cache("cache offline".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to create test cache (requires running Redis instance)
    async fn create_test_cache() -> RedisCache {
        let url = std::env::var("GUESTBOOK_TEST_REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".into());
        RedisCache::connect(&url)
            .await
            .expect("Failed to connect to Redis (ensure Redis is running)")
    }

    #[tokio::test]
    #[ignore] // Requires running Redis instance
    async fn test_set_get_delete() {
        let cache = create_test_cache().await;

        cache
            .set_with_ttl("gb_test:key1", b"value1".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            cache.get("gb_test:key1").await.unwrap(),
            Some(b"value1".to_vec())
        );

        cache.delete("gb_test:key1").await.unwrap();
        assert_eq!(cache.get("gb_test:key1").await.unwrap(), None);

        // Deleting again is a no-op, not an error.
        cache.delete("gb_test:key1").await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_incr_and_read() {
        let cache = create_test_cache().await;
        cache.delete("gb_test:counter").await.unwrap();

        assert_eq!(cache.incr("gb_test:counter", 5).await.unwrap(), 5);
        assert_eq!(cache.incr("gb_test:counter", -2).await.unwrap(), 3);
        assert_eq!(cache.read_i64("gb_test:counter").await.unwrap(), Some(3));

        cache.delete("gb_test:counter").await.unwrap();
    }

    #[tokio::test]
    async fn offline_cache_fails_every_operation() {
        let cache = OfflineCache;

        assert!(cache.get("k").await.is_err());
        assert!(cache
            .set_with_ttl("k", vec![1], Duration::from_secs(1))
            .await
            .is_err());
        assert!(cache.delete("k").await.is_err());
        assert!(cache.incr("k", 1).await.is_err());
        assert!(cache.ping().await.is_err());
    }
}
