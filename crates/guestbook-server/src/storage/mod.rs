//! Storage layer
//!
//! PostgreSQL is the authoritative store; Redis holds the derived snapshot
//! and advisory counter. The in-memory cache backs tests and local runs.

pub mod cache;
pub mod db;
pub mod memory;

pub use cache::{OfflineCache, RedisCache};
pub use db::Database;
pub use memory::MemoryCache;
