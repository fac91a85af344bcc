//! Business logic services

pub mod entries;
pub mod monitor;
pub mod stats;

pub use entries::{CacheStatus, EntryService};
pub use stats::StatsLedger;
