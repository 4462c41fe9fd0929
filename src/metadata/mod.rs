//! Music metadata lookups used to resolve and expand artist names.
//!
//! The pipeline only depends on the [`MetadataResolver`] trait. Lookups never
//! fail hard: an unreachable service, a non-success status or a malformed body
//! all read as "nothing found".

mod musicbrainz;

pub use musicbrainz::{user_agent_header, MusicBrainzClient, MUSICBRAINZ_API_BASE};

use async_trait::async_trait;

/// An artist as known by the metadata service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRef {
    pub id: String,
    /// Canonical name as reported by the service.
    pub name: String,
}

#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Resolve a free-form artist name to the service's best match.
    async fn resolve_artist(&self, name: &str) -> Option<ArtistRef>;

    /// Tag names for an artist, highest vote count first, at most `limit`.
    async fn get_top_tags(&self, artist: &ArtistRef, limit: usize) -> Vec<String>;

    /// Artist names carrying `tag`, in service order, at most `limit`.
    async fn search_by_tag(&self, tag: &str, limit: usize) -> Vec<String>;
}
