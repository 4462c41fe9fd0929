//! SQLite-backed concert events store implementation.

use super::models::{ConcertEvent, ConcertUpdate};
use super::schema::CONCERT_VERSIONED_SCHEMAS;
use super::trait_def::{ConcertError, ConcertResult, ConcertStore};
use crate::sqlite_persistence::migrate_if_needed;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const CONCERT_COLUMNS: &str = "concert_id, owner, artist, date, venue, city";

#[derive(Clone)]
pub struct SqliteConcertStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteConcertStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let mut conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open concerts database at {:?}", db_path))?;
        migrate_if_needed(&mut conn, CONCERT_VERSIONED_SCHEMAS, "concerts")?;

        let count: usize = conn.query_row("SELECT COUNT(*) FROM concert_event", [], |r| r.get(0))?;
        info!("Concert store ready: {} concerts", count);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn row_to_concert(row: &Row) -> rusqlite::Result<ConcertEvent> {
        Ok(ConcertEvent {
            id: row.get(0)?,
            owner: row.get(1)?,
            artist: row.get(2)?,
            date: DateTime::from_timestamp(row.get(3)?, 0).unwrap_or_default(),
            venue: row.get(4)?,
            city: row.get(5)?,
        })
    }

    fn find(conn: &Connection, concert_id: &str) -> rusqlite::Result<Option<ConcertEvent>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM concert_event WHERE concert_id = ?1",
                CONCERT_COLUMNS
            ),
            params![concert_id],
            Self::row_to_concert,
        )
        .optional()
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

impl ConcertStore for SqliteConcertStore {
    fn add_concert(
        &self,
        user: &str,
        artist: &str,
        date: DateTime<Utc>,
        venue: &str,
        city: &str,
    ) -> ConcertResult<ConcertEvent> {
        let conn = self.conn.lock().unwrap();
        let existing: Option<String> = conn
            .query_row(
                "SELECT concert_id FROM concert_event
                 WHERE owner = ?1 AND artist = ?2 AND date = ?3 AND venue = ?4",
                params![user, artist, date.timestamp(), venue],
                |r| r.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(ConcertError::Duplicate);
        }

        let concert = ConcertEvent {
            id: uuid::Uuid::new_v4().to_string(),
            owner: user.to_string(),
            artist: artist.to_string(),
            date: DateTime::from_timestamp(date.timestamp(), 0).unwrap_or_default(),
            venue: venue.to_string(),
            city: city.to_string(),
        };
        conn.execute(
            &format!(
                "INSERT INTO concert_event ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                CONCERT_COLUMNS
            ),
            params![
                concert.id,
                concert.owner,
                concert.artist,
                date.timestamp(),
                concert.venue,
                concert.city
            ],
        )?;
        debug!("Added concert {} ({} at {}) for {}", concert.id, artist, venue, user);
        Ok(concert)
    }

    fn edit_concert_details(
        &self,
        concert_id: &str,
        update: &ConcertUpdate,
    ) -> ConcertResult<ConcertEvent> {
        let conn = self.conn.lock().unwrap();
        let Some(mut concert) = Self::find(&conn, concert_id)? else {
            return Err(ConcertError::NotFound(concert_id.to_string()));
        };
        if update.is_empty() {
            return Err(ConcertError::EmptyUpdate);
        }

        if let Some(artist) = &update.artist {
            concert.artist = artist.clone();
        }
        if let Some(date) = update.date {
            concert.date = DateTime::from_timestamp(date.timestamp(), 0).unwrap_or_default();
        }
        if let Some(venue) = &update.venue {
            concert.venue = venue.clone();
        }
        if let Some(city) = &update.city {
            concert.city = city.clone();
        }

        conn.execute(
            "UPDATE concert_event SET artist = ?1, date = ?2, venue = ?3, city = ?4
             WHERE concert_id = ?5",
            params![
                concert.artist,
                concert.date.timestamp(),
                concert.venue,
                concert.city,
                concert_id
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                ConcertError::Duplicate
            } else {
                e.into()
            }
        })?;
        debug!("Updated concert {}", concert_id);
        Ok(concert)
    }

    fn delete_concert(&self, user: &str, concert_id: &str) -> ConcertResult<()> {
        let conn = self.conn.lock().unwrap();
        let Some(concert) = Self::find(&conn, concert_id)? else {
            return Err(ConcertError::NotFound(concert_id.to_string()));
        };
        if concert.owner != user {
            return Err(ConcertError::NotOwner {
                user: user.to_string(),
                concert: concert_id.to_string(),
            });
        }
        conn.execute(
            "DELETE FROM concert_event WHERE concert_id = ?1",
            params![concert_id],
        )?;
        debug!("Deleted concert {} for {}", concert_id, user);
        Ok(())
    }

    fn get_concert(&self, concert_id: &str) -> ConcertResult<Option<ConcertEvent>> {
        let conn = self.conn.lock().unwrap();
        Ok(Self::find(&conn, concert_id)?)
    }

    fn get_concerts_by_user(&self, user: &str) -> ConcertResult<Vec<ConcertEvent>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM concert_event WHERE owner = ?1 ORDER BY date ASC, id ASC",
            CONCERT_COLUMNS
        ))?;
        let concerts = stmt
            .query_map(params![user], Self::row_to_concert)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(concerts)
    }
}
