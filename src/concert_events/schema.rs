//! SQLite schema definitions for the concert events database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

const CONCERT_EVENT_TABLE: Table = Table {
    name: "concert_event",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("concert_id", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("owner", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("date", &SqlType::Integer, non_null = true),
        sqlite_column!("venue", &SqlType::Text, non_null = true),
        sqlite_column!("city", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_concert_event_owner", "owner")],
    unique_constraints: &[&["owner", "artist", "date", "venue"]],
};

pub const CONCERT_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[CONCERT_EVENT_TABLE],
    migration: None,
}];
