//! SQLite schema definitions for the concert stats database.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};

const STATS_RECORD_FK: ForeignKey = ForeignKey {
    foreign_table: "stats_record",
    foreign_column: "user_id",
    on_delete: ForeignKeyOnChange::Cascade,
};

/// One row per initialized user.
const STATS_RECORD_TABLE: Table = Table {
    name: "stats_record",
    columns: &[
        sqlite_column!("user_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("summary", &SqlType::Text),
        sqlite_column!("recommendations", &SqlType::Text), // JSON array
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!(
            "updated",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

/// Attendance history. The integer primary key carries insertion order.
const ATTENDANCE_ENTRY_TABLE: Table = Table {
    name: "attendance_entry",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("entry_id", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "user_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&STATS_RECORD_FK)
        ),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("venue", &SqlType::Text, non_null = true),
        sqlite_column!("date", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_attendance_entry_user_id", "user_id")],
    unique_constraints: &[],
};

pub const STATS_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[STATS_RECORD_TABLE, ATTENDANCE_ENTRY_TABLE],
    migration: None,
}];
