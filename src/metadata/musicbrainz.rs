//! MusicBrainz API client for resolving artists and their genre tags.
//!
//! MusicBrainz asks clients to stay at or below 1 request per second, so every
//! request waits on a shared rate limiter first.

use super::{ArtistRef, MetadataResolver};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const MUSICBRAINZ_API_BASE: &str = "https://musicbrainz.org/ws/2";

/// Build the `User-Agent` value MusicBrainz expects: `app/version (contact)`.
pub fn user_agent_header(client_id: &str, contact: Option<&str>) -> String {
    match contact.map(str::trim).filter(|c| !c.is_empty()) {
        Some(contact) => format!("{} ({})", client_id, contact),
        None => client_id.to_string(),
    }
}

struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!("MusicBrainz rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }
        *last = Some(Instant::now());
    }
}

pub struct MusicBrainzClient {
    http_client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
}

#[derive(Deserialize)]
struct ArtistSearchResponse {
    artists: Option<Vec<MbArtist>>,
}

#[derive(Deserialize)]
struct MbArtist {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize)]
struct ArtistTagsResponse {
    tags: Option<Vec<MbTag>>,
}

#[derive(Deserialize)]
struct MbTag {
    name: Option<String>,
    count: Option<i64>,
}

impl MusicBrainzClient {
    /// Build a client that is meant to be created once and shared.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. [`MUSICBRAINZ_API_BASE`].
    /// * `user_agent` - Full `User-Agent` value, see [`user_agent_header`].
    /// * `timeout` - Per-request timeout.
    /// * `min_interval` - Minimum spacing between two requests.
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
        min_interval: Duration,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to build MusicBrainz HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::new(min_interval),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        self.rate_limiter.wait().await;
        debug!(url = %url, "Querying MusicBrainz API");

        let response = match self.http_client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "MusicBrainz request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "MusicBrainz returned an error status");
            return None;
        }

        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(url = %url, error = %e, "Malformed MusicBrainz response");
                None
            }
        }
    }
}

#[async_trait]
impl MetadataResolver for MusicBrainzClient {
    async fn resolve_artist(&self, name: &str) -> Option<ArtistRef> {
        let query = format!("artist:\"{}\"", name);
        let url = format!(
            "{}/artist?query={}&fmt=json",
            self.base_url,
            urlencoding::encode(&query)
        );

        let body: ArtistSearchResponse = self.get_json(&url).await?;
        let artist = body.artists.unwrap_or_default().into_iter().next()?;
        match (artist.id, artist.name) {
            (Some(id), Some(name)) => Some(ArtistRef { id, name }),
            _ => {
                debug!(query = %name, "MusicBrainz match without id or name");
                None
            }
        }
    }

    async fn get_top_tags(&self, artist: &ArtistRef, limit: usize) -> Vec<String> {
        let url = format!(
            "{}/artist/{}?inc=tags&fmt=json",
            self.base_url,
            urlencoding::encode(&artist.id)
        );

        let Some(body) = self.get_json::<ArtistTagsResponse>(&url).await else {
            return Vec::new();
        };

        let mut tags = body.tags.unwrap_or_default();
        // Stable, so equal counts keep the service's order
        tags.sort_by_key(|t| std::cmp::Reverse(t.count.unwrap_or(0)));
        tags.into_iter()
            .filter_map(|t| t.name)
            .take(limit)
            .collect()
    }

    async fn search_by_tag(&self, tag: &str, limit: usize) -> Vec<String> {
        let query = format!("tag:\"{}\"", tag);
        let url = format!(
            "{}/artist?query={}&limit={}&fmt=json",
            self.base_url,
            urlencoding::encode(&query),
            limit
        );

        let Some(body) = self.get_json::<ArtistSearchResponse>(&url).await else {
            return Vec::new();
        };

        body.artists
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| a.name)
            .take(limit)
            .collect()
    }
}
