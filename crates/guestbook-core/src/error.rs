//! Error types for the guestbook service

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuestbookError>;

/// Main error type for the guestbook service.
///
/// Store failures are fatal to the current operation and propagate to the
/// caller. Cache failures are advisory: every call site treats them the same
/// as a missing cached value and logs them instead of surfacing them.
#[derive(Error, Debug)]
pub enum GuestbookError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Entry not found: {0}")]
    NotFound(i32),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl GuestbookError {
    /// True for cache-side failures, which must never fail a request.
    pub fn is_advisory(&self) -> bool {
        matches!(self, GuestbookError::Cache(_))
    }
}
