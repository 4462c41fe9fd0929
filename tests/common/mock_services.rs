//! wiremock stand-ins for MusicBrainz and Gemini

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::{GEMINI_TEST_KEY, TEST_USER_AGENT};

pub struct MockMusicBrainz {
    pub server: MockServer,
}

impl MockMusicBrainz {
    /// Starts a server where every artist lookup misses.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/artist"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"artists": []})))
            .with_priority(10)
            .mount(&server)
            .await;
        Self { server }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Makes `query` resolve to (`mbid`, `canonical`) and gives it `tags` as (name, count).
    pub async fn artist(&self, query: &str, mbid: &str, canonical: &str, tags: &[(&str, i64)]) {
        Mock::given(method("GET"))
            .and(path("/artist"))
            .and(query_param("query", format!("artist:\"{}\"", query)))
            .and(header("user-agent", TEST_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "artists": [{"id": mbid, "name": canonical, "score": 100}]
            })))
            .mount(&self.server)
            .await;

        let tags: Vec<_> = tags
            .iter()
            .map(|(name, count)| json!({"name": name, "count": count}))
            .collect();
        Mock::given(method("GET"))
            .and(path(format!("/artist/{}", mbid)))
            .and(query_param("inc", "tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": mbid,
                "name": canonical,
                "tags": tags
            })))
            .mount(&self.server)
            .await;
    }

    /// Shorthand for an artist that resolves to itself and has no tags.
    pub async fn plain_artist(&self, name: &str) {
        let mbid = format!("mbid-{}", name.to_lowercase().replace(' ', "-"));
        self.artist(name, &mbid, name, &[]).await;
    }

    pub async fn tag(&self, tag: &str, artists: &[&str]) {
        let artists: Vec<_> = artists.iter().map(|name| json!({"name": name})).collect();
        Mock::given(method("GET"))
            .and(path("/artist"))
            .and(query_param("query", format!("tag:\"{}\"", tag)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "artists": artists
            })))
            .mount(&self.server)
            .await;
    }
}

/// Gemini endpoint that always answers with `reply`.
pub async fn mock_gemini(reply: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(query_param("key", GEMINI_TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": reply}]},
                "finishReason": "STOP"
            }]
        })))
        .mount(&server)
        .await;
    server
}

/// Gemini endpoint that fails every request with `status`.
pub async fn failing_gemini(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}
