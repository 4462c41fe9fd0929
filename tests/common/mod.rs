//! Common test infrastructure
//!
//! End-to-end tests run the real SQLite stores, the real MusicBrainz and
//! Gemini clients, and point the clients at wiremock servers.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{MockMusicBrainz, TestEnv, TEST_USER};
//!
//! #[tokio::test]
//! async fn test_summary() {
//!     let musicbrainz = MockMusicBrainz::start().await;
//!     let env = TestEnv::new(&musicbrainz.uri());
//!     env.stats.initialize_user(TEST_USER).unwrap();
//! }
//! ```

mod constants;
mod mock_services;

pub use constants::*;
pub use mock_services::{failing_gemini, mock_gemini, MockMusicBrainz};

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use venu_stats::concert_stats::{
    create_candidate_generator, RecommendationStrategy, RecommendationValidator, SqliteStatsStore,
    SummarySynthesizer,
};
use venu_stats::config::LlmSettings;
use venu_stats::llm::LlmProviderKind;
use venu_stats::metadata::{MetadataResolver, MusicBrainzClient};
use venu_stats::{SqliteAlbumStore, SqliteConcertStore};

/// Stores in a throwaway directory plus a resolver pointed at a mock server.
pub struct TestEnv {
    pub stats: Arc<SqliteStatsStore>,
    #[allow(dead_code)]
    pub concerts: SqliteConcertStore,
    #[allow(dead_code)]
    pub albums: SqliteAlbumStore,
    resolver: Arc<dyn MetadataResolver>,
    _temp_dir: TempDir,
}

impl TestEnv {
    pub fn new(musicbrainz_uri: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let stats = Arc::new(SqliteStatsStore::new(temp_dir.path().join("stats.db")).unwrap());
        let concerts = SqliteConcertStore::new(temp_dir.path().join("concerts.db")).unwrap();
        let albums = SqliteAlbumStore::new(temp_dir.path().join("albums.db")).unwrap();
        let resolver = Arc::new(
            MusicBrainzClient::new(
                musicbrainz_uri,
                TEST_USER_AGENT,
                Duration::from_secs(2),
                Duration::ZERO,
            )
            .unwrap(),
        );
        Self {
            stats,
            concerts,
            albums,
            resolver,
            _temp_dir: temp_dir,
        }
    }

    pub fn tag_synthesizer(&self) -> SummarySynthesizer {
        self.synthesizer(RecommendationStrategy::Tags, &LlmSettings::default())
    }

    #[allow(dead_code)]
    pub fn gemini_synthesizer(&self, gemini_uri: &str) -> SummarySynthesizer {
        let llm = LlmSettings {
            provider: LlmProviderKind::Gemini,
            base_url: gemini_uri.to_string(),
            api_key: Some(GEMINI_TEST_KEY.to_string()),
            timeout_secs: 2,
            ..LlmSettings::default()
        };
        self.synthesizer(RecommendationStrategy::Generative, &llm)
    }

    fn synthesizer(&self, strategy: RecommendationStrategy, llm: &LlmSettings) -> SummarySynthesizer {
        let generator =
            create_candidate_generator(strategy, self.resolver.clone(), 15, llm).unwrap();
        SummarySynthesizer::new(
            self.stats.clone(),
            generator,
            RecommendationValidator::new(self.resolver.clone()),
        )
    }
}
