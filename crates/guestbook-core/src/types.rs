//! Core domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single guestbook entry.
///
/// `id` and `created_at` are assigned by the store at insert time; `name`
/// and `message` are caller-supplied and mutable via update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i32,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// One sample of backend liveness, recomputed on every monitor tick.
///
/// Never persisted; `db_row_count` is `None` when the count query failed
/// that tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthSample {
    pub db_row_count: Option<i64>,
    pub db_up: bool,
    pub cache_up: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_with_expected_field_names() {
        let entry = Entry {
            id: 1,
            name: "Alice".to_string(),
            message: "hi".to_string(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["message"], "hi");
        assert!(value.get("created_at").is_some());
    }

    #[test]
    fn entry_round_trips_through_json() {
        let entry = Entry {
            id: 7,
            name: "Bob".to_string(),
            message: "hello there".to_string(),
            created_at: "2024-03-01T12:00:00Z".parse().unwrap(),
        };

        let bytes = serde_json::to_vec(&entry).unwrap();
        let back: Entry = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, entry);
    }
}
