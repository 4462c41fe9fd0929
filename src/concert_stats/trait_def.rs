//! StatsStore trait definition.

use super::models::{AttendanceEntry, StatsRecord};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned by stats storage backends.
#[derive(Debug, Error)]
pub enum StatsStoreError {
    #[error("Stats record not found for user {0}")]
    NotInitialized(String),

    #[error("Stats record already exists for user {0}")]
    AlreadyInitialized(String),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for StatsStoreError {
    fn from(e: rusqlite::Error) -> Self {
        StatsStoreError::Storage(e.into())
    }
}

pub type StatsResult<T> = Result<T, StatsStoreError>;

/// Trait for concert stats storage backends.
pub trait StatsStore: Send + Sync {
    /// Create an empty record for a user. Fails if one already exists.
    fn initialize_user(&self, user_id: &str) -> StatsResult<StatsRecord>;

    /// Append an attendance entry at the end of the user's history.
    fn append_entry(
        &self,
        user_id: &str,
        artist: &str,
        venue: &str,
        date: DateTime<Utc>,
    ) -> StatsResult<AttendanceEntry>;

    /// Get the user's history, oldest first.
    fn get_history(&self, user_id: &str) -> StatsResult<Vec<AttendanceEntry>>;

    /// Get the full record, or `None` if the user was never initialized.
    fn get_record(&self, user_id: &str) -> StatsResult<Option<StatsRecord>>;

    /// Remove the oldest entry matching both artist and venue.
    ///
    /// Returns whether an entry was removed. A missing match is not an error.
    fn remove_entry(&self, user_id: &str, artist: &str, venue: &str) -> StatsResult<bool>;

    /// Overwrite summary and recommendations in a single update, returning the
    /// new `updated_at`.
    fn save_summary(
        &self,
        user_id: &str,
        summary: &str,
        recommendations: &[String],
    ) -> StatsResult<DateTime<Utc>>;
}
