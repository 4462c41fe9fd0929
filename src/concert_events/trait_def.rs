//! ConcertStore trait definition.

use super::models::{ConcertEvent, ConcertUpdate};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConcertError {
    #[error("Concert with ID '{0}' not found")]
    NotFound(String),

    #[error("User {user} is not the owner of concert {concert}")]
    NotOwner { user: String, concert: String },

    #[error("A concert with these details already exists for this user")]
    Duplicate,

    #[error("No details provided to update")]
    EmptyUpdate,

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for ConcertError {
    fn from(e: rusqlite::Error) -> Self {
        ConcertError::Storage(e.into())
    }
}

pub type ConcertResult<T> = Result<T, ConcertError>;

/// Trait for concert event storage backends.
pub trait ConcertStore: Send + Sync {
    /// Record a concert. The same (owner, artist, date, venue) can only be added once.
    fn add_concert(
        &self,
        user: &str,
        artist: &str,
        date: DateTime<Utc>,
        venue: &str,
        city: &str,
    ) -> ConcertResult<ConcertEvent>;

    /// Apply the provided fields and return the updated concert.
    fn edit_concert_details(
        &self,
        concert_id: &str,
        update: &ConcertUpdate,
    ) -> ConcertResult<ConcertEvent>;

    /// Delete a concert owned by `user`.
    fn delete_concert(&self, user: &str, concert_id: &str) -> ConcertResult<()>;

    fn get_concert(&self, concert_id: &str) -> ConcertResult<Option<ConcertEvent>>;

    /// All concerts owned by `user`, by date.
    fn get_concerts_by_user(&self, user: &str) -> ConcertResult<Vec<ConcertEvent>>;
}
