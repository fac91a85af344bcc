//! Stats handler

use crate::services::stats::LIVE_TOTAL_KEY;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Authoritative row count from the store.
    total_entries_db: i64,
    /// Advisory live-entry counter from the cache; absent when the cache
    /// has no value or is unreachable. May drift from the authoritative
    /// count.
    live_total: Option<i64>,
    cache_available: bool,
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, StatusCode> {
    let total_entries_db = match state.store.count_entries().await {
        Ok(count) => count,
        Err(e) => {
            tracing::error!("Failed to count entries: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Ok(Json(StatsResponse {
        total_entries_db,
        live_total: state.stats.read(LIVE_TOTAL_KEY).await,
        cache_available: state.cache.ping().await.is_ok(),
    }))
}
