//! Metric names and Prometheus exporter setup

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const CACHE_HITS_TOTAL: &str = "guestbook_cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "guestbook_cache_misses_total";
pub const DB_ENTRIES_TOTAL: &str = "guestbook_db_entries_total";
pub const DB_UP: &str = "guestbook_db_up";
pub const CACHE_UP: &str = "guestbook_cache_up";

/// Install the global Prometheus recorder and register metric help text.
///
/// The returned handle renders the exposition text for the `/metrics`
/// endpoint.
pub fn install() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    describe_counter!(CACHE_HITS_TOTAL, "Total number of cache hits");
    describe_counter!(CACHE_MISSES_TOTAL, "Total number of cache misses");
    describe_gauge!(DB_ENTRIES_TOTAL, "Total number of entries in the database");
    describe_gauge!(DB_UP, "Database availability (1 = up, 0 = down)");
    describe_gauge!(CACHE_UP, "Cache availability (1 = up, 0 = down)");

    Ok(handle)
}
