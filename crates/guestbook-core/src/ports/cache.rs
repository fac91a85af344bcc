//! Cache trait for the derived snapshot and advisory counters

use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Key-value cache holding the serialized entry snapshot and the advisory
/// counter.
///
/// Every method may fail at any time (cache restart, eviction, network);
/// callers treat `Err` identically to "no cached value" and never let it
/// fail the primary operation.
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// Get raw bytes for a key. `Ok(None)` on absent or expired keys.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value that expires after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Atomically add `delta` (may be negative) to an integer key,
    /// returning the new value. Absent keys start at zero.
    async fn incr(&self, key: &str, delta: i64) -> Result<i64>;

    /// Read an integer key. `Ok(None)` when absent.
    async fn read_i64(&self, key: &str) -> Result<Option<i64>>;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<()>;
}
