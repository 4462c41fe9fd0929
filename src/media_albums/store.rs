//! SQLite-backed media albums store implementation.

use super::models::{MediaAlbum, MediaItem, MediaType};
use super::schema::ALBUM_VERSIONED_SCHEMAS;
use super::trait_def::{AlbumError, AlbumResult, AlbumStore};
use crate::sqlite_persistence::migrate_if_needed;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

#[derive(Clone)]
pub struct SqliteAlbumStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAlbumStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let mut conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open albums database at {:?}", db_path))?;
        migrate_if_needed(&mut conn, ALBUM_VERSIONED_SCHEMAS, "albums")?;

        let albums: usize = conn.query_row("SELECT COUNT(*) FROM media_album", [], |r| r.get(0))?;
        let items: usize = conn.query_row("SELECT COUNT(*) FROM media_item", [], |r| r.get(0))?;
        info!("Album store ready: {} albums, {} media items", albums, items);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Album row without items: (owner, concert, created).
    fn find_album(
        conn: &Connection,
        album_id: &str,
    ) -> rusqlite::Result<Option<(String, String, i64)>> {
        conn.query_row(
            "SELECT owner, concert, created FROM media_album WHERE album_id = ?1",
            params![album_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()
    }

    fn load_items(conn: &Connection, album_id: &str) -> AlbumResult<Vec<MediaItem>> {
        let mut stmt = conn.prepare_cached(
            "SELECT item_id, url, uploaded, media_type FROM media_item
             WHERE album_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![album_id], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, i64>(2)?,
                    r.get::<_, String>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, url, uploaded, media_type)| {
                let media_type = MediaType::parse(&media_type).ok_or_else(|| {
                    AlbumError::Storage(anyhow!("Unknown media type {:?} for item {}", media_type, id))
                })?;
                Ok(MediaItem {
                    id,
                    url,
                    upload_timestamp: timestamp_to_datetime(uploaded),
                    media_type,
                })
            })
            .collect()
    }

    fn load_album(
        conn: &Connection,
        album_id: &str,
        (owner, concert, created): (String, String, i64),
    ) -> AlbumResult<MediaAlbum> {
        Ok(MediaAlbum {
            id: album_id.to_string(),
            owner,
            concert,
            items: Self::load_items(conn, album_id)?,
            created_at: timestamp_to_datetime(created),
        })
    }
}

fn timestamp_to_datetime(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

impl AlbumStore for SqliteAlbumStore {
    fn create_album(&self, user: &str, concert: &str) -> AlbumResult<MediaAlbum> {
        let conn = self.conn.lock().unwrap();
        let existing: Option<String> = conn
            .query_row(
                "SELECT album_id FROM media_album WHERE owner = ?1 AND concert = ?2",
                params![user, concert],
                |r| r.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(AlbumError::AlreadyExists {
                user: user.to_string(),
                concert: concert.to_string(),
            });
        }

        let album = MediaAlbum {
            id: uuid::Uuid::new_v4().to_string(),
            owner: user.to_string(),
            concert: concert.to_string(),
            items: Vec::new(),
            created_at: timestamp_to_datetime(Utc::now().timestamp()),
        };
        conn.execute(
            "INSERT INTO media_album (album_id, owner, concert, created) VALUES (?1, ?2, ?3, ?4)",
            params![album.id, album.owner, album.concert, album.created_at.timestamp()],
        )?;
        debug!("Created album {} for {} / {}", album.id, user, concert);
        Ok(album)
    }

    fn upload_media(
        &self,
        user: &str,
        album_id: &str,
        url: &str,
        uploaded_at: DateTime<Utc>,
        media_type: MediaType,
    ) -> AlbumResult<MediaItem> {
        let conn = self.conn.lock().unwrap();
        let Some((owner, _, _)) = Self::find_album(&conn, album_id)? else {
            return Err(AlbumError::NotFound(album_id.to_string()));
        };
        if owner != user {
            return Err(AlbumError::NotOwner {
                user: user.to_string(),
                album: album_id.to_string(),
            });
        }

        let item = MediaItem {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.to_string(),
            upload_timestamp: timestamp_to_datetime(uploaded_at.timestamp()),
            media_type,
        };
        conn.execute(
            "INSERT INTO media_item (item_id, album_id, url, uploaded, media_type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                item.id,
                album_id,
                item.url,
                uploaded_at.timestamp(),
                media_type.as_str()
            ],
        )?;
        debug!("Added {} {} to album {}", media_type, item.id, album_id);
        Ok(item)
    }

    fn get_media_album(&self, album_id: &str) -> AlbumResult<MediaAlbum> {
        let conn = self.conn.lock().unwrap();
        let Some(row) = Self::find_album(&conn, album_id)? else {
            return Err(AlbumError::NotFound(album_id.to_string()));
        };
        Self::load_album(&conn, album_id, row)
    }

    fn get_albums_by_user_and_concert(
        &self,
        user: &str,
        concert: &str,
    ) -> AlbumResult<Vec<MediaAlbum>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT album_id, owner, concert, created FROM media_album
             WHERE owner = ?1 AND concert = ?2 ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![user, concert], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    (
                        r.get::<_, String>(1)?,
                        r.get::<_, String>(2)?,
                        r.get::<_, i64>(3)?,
                    ),
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(album_id, row)| Self::load_album(&conn, &album_id, row))
            .collect()
    }
}
