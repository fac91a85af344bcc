//! Storage trait for the authoritative entry store

use crate::types::Entry;
use crate::Result;
use async_trait::async_trait;

/// Authoritative persistence for guestbook entries.
///
/// All mutations go through the store first; cache state is only ever a
/// derived projection of it.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Insert an entry; the store assigns `id` and `created_at`.
    async fn insert_entry(&self, name: &str, message: &str) -> Result<Entry>;

    /// Update an entry's fields. Returns `false` if no row matched `id`.
    async fn update_entry(&self, id: i32, name: &str, message: &str) -> Result<bool>;

    /// Delete an entry. Returns `false` if no row matched `id`.
    async fn delete_entry(&self, id: i32) -> Result<bool>;

    /// The most recent `limit` entries, newest first by `created_at`.
    async fn recent_entries(&self, limit: i64) -> Result<Vec<Entry>>;

    /// Authoritative row count.
    async fn count_entries(&self) -> Result<i64>;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<()>;
}
