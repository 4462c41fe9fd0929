//! AlbumStore trait definition.

use super::models::{MediaAlbum, MediaItem, MediaType};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlbumError {
    #[error("Media album '{0}' not found")]
    NotFound(String),

    #[error("User {user} is not the owner of album {album}")]
    NotOwner { user: String, album: String },

    #[error("Album for user {user} and concert {concert} already exists")]
    AlreadyExists { user: String, concert: String },

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for AlbumError {
    fn from(e: rusqlite::Error) -> Self {
        AlbumError::Storage(e.into())
    }
}

pub type AlbumResult<T> = Result<T, AlbumError>;

/// Trait for media album storage backends.
///
/// Concert ids are opaque here; callers check that the concert exists.
pub trait AlbumStore: Send + Sync {
    /// Create an empty album. Each user gets at most one album per concert.
    fn create_album(&self, user: &str, concert: &str) -> AlbumResult<MediaAlbum>;

    /// Append a media reference to an album owned by `user`.
    fn upload_media(
        &self,
        user: &str,
        album_id: &str,
        url: &str,
        uploaded_at: DateTime<Utc>,
        media_type: MediaType,
    ) -> AlbumResult<MediaItem>;

    fn get_media_album(&self, album_id: &str) -> AlbumResult<MediaAlbum>;

    fn get_albums_by_user_and_concert(
        &self,
        user: &str,
        concert: &str,
    ) -> AlbumResult<Vec<MediaAlbum>>;
}
