//! Entry CRUD handlers

use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use guestbook_core::{Entry, GuestbookError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    name: String,
    message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: &'static str,
}

fn error_status(e: &GuestbookError) -> StatusCode {
    match e {
        GuestbookError::Validation(_) => StatusCode::BAD_REQUEST,
        GuestbookError::NotFound(_) => StatusCode::NOT_FOUND,
        GuestbookError::Store(_) | GuestbookError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn fail(context: &str, e: GuestbookError) -> StatusCode {
    let status = error_status(&e);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("{}: {}", context, e);
    }
    status
}

pub async fn list(State(state): State<AppState>) -> Result<Response, StatusCode> {
    match state.entries.list_recent().await {
        Ok((entries, cache_status)) => {
            let headers = [("x-cache", cache_status.to_string())];
            Ok((headers, Json(entries)).into_response())
        }
        Err(e) => Err(fail("Failed to list entries", e)),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<EntryRequest>,
) -> Result<(StatusCode, Json<Entry>), StatusCode> {
    match state.entries.create(&req.name, &req.message).await {
        Ok(entry) => Ok((StatusCode::CREATED, Json(entry))),
        Err(e) => Err(fail("Failed to create entry", e)),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<EntryRequest>,
) -> Result<Json<MessageResponse>, StatusCode> {
    match state.entries.update(id, &req.name, &req.message).await {
        Ok(()) => Ok(Json(MessageResponse {
            message: "entry updated",
        })),
        Err(e) => Err(fail("Failed to update entry", e)),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    match state.entries.delete(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(fail("Failed to delete entry", e)),
    }
}
