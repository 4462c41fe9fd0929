//! Venu concert stats library
//!
//! Attendance history, concert and album records, and the summary pipeline
//! behind the `venu-stats` binary.

pub mod cli_style;
pub mod concert_events;
pub mod concert_stats;
pub mod config;
pub mod llm;
pub mod media_albums;
pub mod metadata;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use concert_events::{ConcertStore, SqliteConcertStore};
pub use concert_stats::{SqliteStatsStore, StatsStore, SummaryError, SummarySynthesizer};
pub use media_albums::{AlbumStore, SqliteAlbumStore};
pub use metadata::{MetadataResolver, MusicBrainzClient};
