//! Data models for the concert stats database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single concert the user attended.
///
/// Entries are never edited in place, only appended or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub id: String,
    pub artist: String,
    pub venue: String,
    pub date: DateTime<Utc>,
}

/// Per-user container for attendance history and the last synthesized result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsRecord {
    pub user_id: String,
    /// Oldest first.
    pub history: Vec<AttendanceEntry>,
    pub summary: Option<String>,
    pub recommendations: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of a user's stats record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    NotInitialized,
    Initialized,
    HasHistory,
    Summarized,
}

impl RecordState {
    pub fn of(record: Option<&StatsRecord>) -> Self {
        match record {
            None => RecordState::NotInitialized,
            Some(r) if r.summary.is_some() && !r.history.is_empty() => RecordState::Summarized,
            Some(r) if !r.history.is_empty() => RecordState::HasHistory,
            Some(_) => RecordState::Initialized,
        }
    }
}

impl std::fmt::Display for RecordState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RecordState::NotInitialized => "not initialized",
            RecordState::Initialized => "initialized",
            RecordState::HasHistory => "has history",
            RecordState::Summarized => "summarized",
        };
        write!(f, "{}", label)
    }
}
