//! Data models for the concert events database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A concert a user attended, with where and when it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcertEvent {
    pub id: String,
    pub owner: String,
    pub artist: String,
    pub date: DateTime<Utc>,
    pub venue: String,
    pub city: String,
}

/// Fields to change on an existing concert. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct ConcertUpdate {
    pub artist: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub city: Option<String>,
}

impl ConcertUpdate {
    pub fn is_empty(&self) -> bool {
        self.artist.is_none() && self.date.is_none() && self.venue.is_none() && self.city.is_none()
    }
}
