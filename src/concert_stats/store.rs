//! SQLite-backed concert stats store implementation.

use super::models::{AttendanceEntry, StatsRecord};
use super::schema::STATS_VERSIONED_SCHEMAS;
use super::trait_def::{StatsResult, StatsStore, StatsStoreError};
use crate::sqlite_persistence::migrate_if_needed;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// SQLite-backed stats store.
#[derive(Clone)]
pub struct SqliteStatsStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStatsStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let mut conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open stats database at {:?}", db_path))?;
        migrate_if_needed(&mut conn, STATS_VERSIONED_SCHEMAS, "stats")?;

        let users: usize = conn.query_row("SELECT COUNT(*) FROM stats_record", [], |r| r.get(0))?;
        let entries: usize =
            conn.query_row("SELECT COUNT(*) FROM attendance_entry", [], |r| r.get(0))?;
        info!(
            "Stats store ready: {} users, {} attendance entries",
            users, entries
        );

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn record_exists(conn: &Connection, user_id: &str) -> rusqlite::Result<bool> {
        conn.query_row(
            "SELECT 1 FROM stats_record WHERE user_id = ?1",
            params![user_id],
            |_| Ok(()),
        )
        .optional()
        .map(|found| found.is_some())
    }

    fn load_history(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<AttendanceEntry>> {
        let mut stmt = conn.prepare_cached(
            "SELECT entry_id, artist, venue, date FROM attendance_entry
             WHERE user_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(AttendanceEntry {
                id: row.get(0)?,
                artist: row.get(1)?,
                venue: row.get(2)?,
                date: timestamp_to_datetime(row.get(3)?),
            })
        })?;
        rows.collect()
    }
}

fn timestamp_to_datetime(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn parse_recommendations(json: Option<String>) -> Option<Vec<String>> {
    json.and_then(|s| {
        serde_json::from_str(&s)
            .map_err(|e| warn!("Malformed recommendations in stats db: {}: {}", s, e))
            .ok()
    })
}

impl StatsStore for SqliteStatsStore {
    fn initialize_user(&self, user_id: &str) -> StatsResult<StatsRecord> {
        {
            let conn = self.conn.lock().unwrap();
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO stats_record (user_id) VALUES (?1)",
                params![user_id],
            )?;
            if inserted == 0 {
                return Err(StatsStoreError::AlreadyInitialized(user_id.to_string()));
            }
        }
        info!("Initialized stats record for user {}", user_id);
        self.get_record(user_id)?
            .ok_or_else(|| StatsStoreError::NotInitialized(user_id.to_string()))
    }

    fn append_entry(
        &self,
        user_id: &str,
        artist: &str,
        venue: &str,
        date: DateTime<Utc>,
    ) -> StatsResult<AttendanceEntry> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        if !Self::record_exists(&tx, user_id)? {
            return Err(StatsStoreError::NotInitialized(user_id.to_string()));
        }

        let entry = AttendanceEntry {
            id: uuid::Uuid::new_v4().to_string(),
            artist: artist.to_string(),
            venue: venue.to_string(),
            date: timestamp_to_datetime(date.timestamp()),
        };
        tx.execute(
            "INSERT INTO attendance_entry (entry_id, user_id, artist, venue, date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![entry.id, user_id, entry.artist, entry.venue, date.timestamp()],
        )?;
        tx.execute(
            "UPDATE stats_record SET updated = ?1 WHERE user_id = ?2",
            params![Utc::now().timestamp(), user_id],
        )?;
        tx.commit()?;

        debug!(
            "Logged {} at {} for user {} ({})",
            entry.artist, entry.venue, user_id, entry.id
        );
        Ok(entry)
    }

    fn get_history(&self, user_id: &str) -> StatsResult<Vec<AttendanceEntry>> {
        let conn = self.conn.lock().unwrap();
        if !Self::record_exists(&conn, user_id)? {
            return Err(StatsStoreError::NotInitialized(user_id.to_string()));
        }
        Ok(Self::load_history(&conn, user_id)?)
    }

    fn get_record(&self, user_id: &str) -> StatsResult<Option<StatsRecord>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT summary, recommendations, created, updated FROM stats_record
                 WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((summary, recommendations, created, updated)) = row else {
            return Ok(None);
        };

        Ok(Some(StatsRecord {
            user_id: user_id.to_string(),
            history: Self::load_history(&conn, user_id)?,
            summary,
            recommendations: parse_recommendations(recommendations),
            created_at: timestamp_to_datetime(created),
            updated_at: timestamp_to_datetime(updated),
        }))
    }

    fn remove_entry(&self, user_id: &str, artist: &str, venue: &str) -> StatsResult<bool> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        if !Self::record_exists(&tx, user_id)? {
            return Err(StatsStoreError::NotInitialized(user_id.to_string()));
        }

        let oldest_match: Option<i64> = tx
            .query_row(
                "SELECT id FROM attendance_entry
                 WHERE user_id = ?1 AND artist = ?2 AND venue = ?3
                 ORDER BY id ASC LIMIT 1",
                params![user_id, artist, venue],
                |r| r.get(0),
            )
            .optional()?;

        let Some(row_id) = oldest_match else {
            debug!(
                "No attendance entry for {} at {} to remove for user {}",
                artist, venue, user_id
            );
            return Ok(false);
        };

        tx.execute("DELETE FROM attendance_entry WHERE id = ?1", params![row_id])?;
        tx.execute(
            "UPDATE stats_record SET updated = ?1 WHERE user_id = ?2",
            params![Utc::now().timestamp(), user_id],
        )?;
        tx.commit()?;
        debug!("Removed {} at {} for user {}", artist, venue, user_id);
        Ok(true)
    }

    fn save_summary(
        &self,
        user_id: &str,
        summary: &str,
        recommendations: &[String],
    ) -> StatsResult<DateTime<Utc>> {
        let recommendations_json =
            serde_json::to_string(recommendations).context("Failed to encode recommendations")?;
        let updated = Utc::now().timestamp();

        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE stats_record SET summary = ?1, recommendations = ?2, updated = ?3
             WHERE user_id = ?4",
            params![summary, recommendations_json, updated, user_id],
        )?;
        if changed == 0 {
            return Err(StatsStoreError::NotInitialized(user_id.to_string()));
        }
        Ok(timestamp_to_datetime(updated))
    }
}
