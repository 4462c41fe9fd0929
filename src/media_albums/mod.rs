//! Per-concert photo and video albums. Media is referenced by URL.

mod models;
mod schema;
mod store;
mod trait_def;

pub use models::{MediaAlbum, MediaItem, MediaType};
pub use store::SqliteAlbumStore;
pub use trait_def::{AlbumError, AlbumResult, AlbumStore};
