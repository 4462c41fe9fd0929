//! End-to-end tests for summary generation
//!
//! Real stores and HTTP clients; MusicBrainz and Gemini are wiremock servers.

mod common;

use chrono::{TimeZone, Utc};
use common::{
    failing_gemini, mock_gemini, MockMusicBrainz, TestEnv, METALLICA_MBID, NIRVANA_MBID,
    RADIOHEAD_MBID, TEST_USER,
};
use venu_stats::concert_stats::{RecordState, StatsStore, StatsStoreError, SummaryError};

fn march(day: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap()
}

async fn metal_musicbrainz() -> MockMusicBrainz {
    let mb = MockMusicBrainz::start().await;
    mb.artist(
        "Metallica",
        METALLICA_MBID,
        "Metallica",
        &[("heavy metal", 8), ("thrash metal", 10), ("metal", 5)],
    )
    .await;
    mb.tag("thrash metal", &["Metallica", "Megadeth", "Slayer", "Anthrax"])
        .await;
    for name in ["Megadeth", "Slayer", "Anthrax"] {
        mb.plain_artist(name).await;
    }
    mb
}

async fn alternative_musicbrainz() -> MockMusicBrainz {
    let mb = MockMusicBrainz::start().await;
    mb.artist(
        "Radiohead",
        RADIOHEAD_MBID,
        "Radiohead",
        &[("alternative rock", 20), ("britpop", 5)],
    )
    .await;
    mb.artist(
        "Nirvana",
        NIRVANA_MBID,
        "Nirvana",
        &[("grunge", 15), ("alternative rock", 10)],
    )
    .await;
    mb.tag("alternative rock", &["RADIOHEAD", "Nirvana", "Pixies"])
        .await;
    mb.tag("britpop", &["Blur"]).await;
    mb.tag("grunge", &["Soundgarden", "Pearl Jam"]).await;
    for name in ["Pixies", "Blur", "Soundgarden", "Muse", "Foo Fighters", "Pearl Jam"] {
        mb.plain_artist(name).await;
    }
    mb
}

// =============================================================================
// Tag expansion strategy
// =============================================================================

#[tokio::test]
async fn test_single_concert_summary() {
    let mb = metal_musicbrainz().await;
    let env = TestEnv::new(&mb.uri());
    env.stats.initialize_user(TEST_USER).unwrap();
    env.stats
        .append_entry(TEST_USER, "Metallica", "Wembley", march(1))
        .unwrap();

    let outcome = env.tag_synthesizer().generate_summary(TEST_USER).await.unwrap();

    assert!(outcome.summary.starts_with("You have attended 1 concert."));
    assert_eq!(
        outcome.summary,
        "You have attended 1 concert. Your most-seen artist so far is Metallica."
    );
    assert_eq!(outcome.recommendations, vec!["Megadeth", "Slayer", "Anthrax"]);
    assert!(outcome
        .recommendations
        .iter()
        .all(|r| !r.eq_ignore_ascii_case("metallica")));

    let record = env.stats.get_record(TEST_USER).unwrap().unwrap();
    assert_eq!(record.summary, Some(outcome.summary));
    assert_eq!(record.recommendations, Some(outcome.recommendations));
    assert_eq!(RecordState::of(Some(&record)), RecordState::Summarized);
}

#[tokio::test]
async fn test_tied_history_expands_top_tags() {
    let mb = alternative_musicbrainz().await;
    let env = TestEnv::new(&mb.uri());
    env.stats.initialize_user(TEST_USER).unwrap();
    env.stats
        .append_entry(TEST_USER, "Radiohead", "O2 Arena", march(1))
        .unwrap();
    env.stats
        .append_entry(TEST_USER, "Nirvana", "Reading", march(2))
        .unwrap();

    let outcome = env.tag_synthesizer().generate_summary(TEST_USER).await.unwrap();

    assert_eq!(outcome.summary, "You have attended 2 concerts.");
    assert_eq!(outcome.recommendations, vec!["Pixies", "Blur", "Soundgarden"]);
}

#[tokio::test]
async fn test_unreachable_metadata_service_yields_no_recommendations() {
    let mb = MockMusicBrainz::start().await;
    let env = TestEnv::new(&mb.uri());
    env.stats.initialize_user(TEST_USER).unwrap();
    env.stats
        .append_entry(TEST_USER, "Metallica", "Wembley", march(1))
        .unwrap();

    let err = env
        .tag_synthesizer()
        .generate_summary(TEST_USER)
        .await
        .unwrap_err();

    assert!(matches!(err, SummaryError::NoValidatedRecommendations));
    let record = env.stats.get_record(TEST_USER).unwrap().unwrap();
    assert!(record.summary.is_none());
    assert!(record.recommendations.is_none());
}

#[tokio::test]
async fn test_summary_tracks_history_changes() {
    let mb = metal_musicbrainz().await;
    let env = TestEnv::new(&mb.uri());
    let synthesizer = env.tag_synthesizer();
    env.stats.initialize_user(TEST_USER).unwrap();
    env.stats
        .append_entry(TEST_USER, "Metallica", "Wembley", march(1))
        .unwrap();
    env.stats
        .append_entry(TEST_USER, "Metallica", "Wembley", march(2))
        .unwrap();

    let first = synthesizer.generate_summary(TEST_USER).await.unwrap();
    assert_eq!(
        first.summary,
        "You have attended 2 concerts. Your most-seen artist so far is Metallica."
    );

    assert!(env
        .stats
        .remove_entry(TEST_USER, "Metallica", "Wembley")
        .unwrap());
    let history = env.stats.get_history(TEST_USER).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].date, march(2));

    let second = synthesizer.generate_summary(TEST_USER).await.unwrap();
    assert_eq!(
        second.summary,
        "You have attended 1 concert. Your most-seen artist so far is Metallica."
    );
    assert!((1..=3).contains(&second.recommendations.len()));
}

// =============================================================================
// Generative strategy (Gemini)
// =============================================================================

#[tokio::test]
async fn test_generative_summary() {
    let mb = alternative_musicbrainz().await;
    let gemini = mock_gemini("Radiohead, Muse, Made Up Band, Foo Fighters, muse, Pearl Jam").await;
    let env = TestEnv::new(&mb.uri());
    env.stats.initialize_user(TEST_USER).unwrap();
    for (artist, day) in [("Radiohead", 1), ("Nirvana", 2), ("Radiohead", 3)] {
        env.stats
            .append_entry(TEST_USER, artist, "Somewhere", march(day))
            .unwrap();
    }

    let outcome = env
        .gemini_synthesizer(&gemini.uri())
        .generate_summary(TEST_USER)
        .await
        .unwrap();

    assert_eq!(
        outcome.summary,
        "You have attended 3 concerts. Your most-seen artist so far is Radiohead."
    );
    assert_eq!(outcome.recommendations, vec!["Muse", "Foo Fighters", "Pearl Jam"]);

    let requests = gemini.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = requests[0].body_json().unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("- Radiohead (2 concerts)\n- Nirvana (1 concert)\n"));
}

#[tokio::test]
async fn test_generative_failure_keeps_previous_summary() {
    let mb = metal_musicbrainz().await;
    let env = TestEnv::new(&mb.uri());
    env.stats.initialize_user(TEST_USER).unwrap();
    env.stats
        .append_entry(TEST_USER, "Metallica", "Wembley", march(1))
        .unwrap();
    let first = env.tag_synthesizer().generate_summary(TEST_USER).await.unwrap();

    let gemini = failing_gemini(500).await;
    let err = env
        .gemini_synthesizer(&gemini.uri())
        .generate_summary(TEST_USER)
        .await
        .unwrap_err();
    assert!(matches!(err, SummaryError::UpstreamUnavailable(_)));

    let gemini = mock_gemini("Metallica, Nobody Famous").await;
    let err = env
        .gemini_synthesizer(&gemini.uri())
        .generate_summary(TEST_USER)
        .await
        .unwrap_err();
    assert!(matches!(err, SummaryError::NoValidatedRecommendations));

    let record = env.stats.get_record(TEST_USER).unwrap().unwrap();
    assert_eq!(record.summary, Some(first.summary));
    assert_eq!(record.recommendations, Some(first.recommendations));
}

// =============================================================================
// Preconditions
// =============================================================================

#[tokio::test]
async fn test_preconditions() {
    let mb = metal_musicbrainz().await;
    let gemini = mock_gemini("Megadeth").await;
    let env = TestEnv::new(&mb.uri());

    let err = env
        .stats
        .append_entry(TEST_USER, "Metallica", "Wembley", march(1))
        .unwrap_err();
    assert!(matches!(err, StatsStoreError::NotInitialized(_)));

    let err = env
        .tag_synthesizer()
        .generate_summary(TEST_USER)
        .await
        .unwrap_err();
    assert!(matches!(err, SummaryError::NotInitialized));

    env.stats.initialize_user(TEST_USER).unwrap();
    let err = env.stats.initialize_user(TEST_USER).unwrap_err();
    assert!(matches!(err, StatsStoreError::AlreadyInitialized(_)));

    for synthesizer in [env.tag_synthesizer(), env.gemini_synthesizer(&gemini.uri())] {
        let err = synthesizer.generate_summary(TEST_USER).await.unwrap_err();
        assert!(matches!(err, SummaryError::EmptyHistory));
    }
    assert!(gemini.received_requests().await.unwrap().is_empty());
}
