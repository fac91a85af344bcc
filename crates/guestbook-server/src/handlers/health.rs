//! Health check handler

use crate::services::monitor;
use crate::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: &'static str,
    redis: &'static str,
    time: DateTime<Utc>,
}

/// Liveness of both backends. Store health drives the overall status; a
/// down cache is reported but does not degrade the service.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let sample = monitor::sample(state.store.as_ref(), state.cache.as_ref()).await;

    Json(HealthResponse {
        status: if sample.db_up { "healthy" } else { "degraded" },
        database: if sample.db_up { "healthy" } else { "unhealthy" },
        redis: if sample.cache_up { "healthy" } else { "unhealthy" },
        time: Utc::now(),
    })
}
