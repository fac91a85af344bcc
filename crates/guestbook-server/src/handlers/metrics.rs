//! Prometheus exposition handler

use crate::AppState;
use axum::extract::State;

pub async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}
