//! Guestbook Core Library
//!
//! Domain types, the error taxonomy, and the storage/cache port traits
//! shared by the guestbook service.

pub mod error;
pub mod ports;
pub mod types;

pub use error::{GuestbookError, Result};
pub use ports::{EntryStore, SnapshotCache};
pub use types::{Entry, HealthSample};
