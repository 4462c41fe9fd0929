//! SQLite schema definitions for the media albums database.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};

const MEDIA_ALBUM_FK: ForeignKey = ForeignKey {
    foreign_table: "media_album",
    foreign_column: "album_id",
    on_delete: ForeignKeyOnChange::Cascade,
};

/// One album per (owner, concert).
const MEDIA_ALBUM_TABLE: Table = Table {
    name: "media_album",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("album_id", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("owner", &SqlType::Text, non_null = true),
        sqlite_column!("concert", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[&["owner", "concert"]],
};

const MEDIA_ITEM_TABLE: Table = Table {
    name: "media_item",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("item_id", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "album_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&MEDIA_ALBUM_FK)
        ),
        sqlite_column!("url", &SqlType::Text, non_null = true),
        sqlite_column!("uploaded", &SqlType::Integer, non_null = true),
        sqlite_column!("media_type", &SqlType::Text, non_null = true), // photo | video
    ],
    indices: &[("idx_media_item_album_id", "album_id")],
    unique_constraints: &[],
};

pub const ALBUM_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[MEDIA_ALBUM_TABLE, MEDIA_ITEM_TABLE],
    migration: None,
}];
