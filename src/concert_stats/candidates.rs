//! Candidate generation strategies.
//!
//! Both strategies propose unvalidated artist names from an
//! [`ArtistFrequency`]. Neither filters against the user's own history beyond
//! what the strategy needs; the validator does that.

use super::error::SummaryError;
use super::frequency::{concert_noun, ArtistFrequency};
use crate::llm::{CompletionOptions, FinishReason, LlmProvider, Message};
use crate::metadata::MetadataResolver;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tags fetched per known artist.
pub const TAGS_PER_ARTIST: usize = 5;
/// Tags expanded into artist searches.
pub const TOP_TAGS: usize = 3;
/// Names proposed by tag expansion.
pub const TAG_PROPOSALS: usize = 3;
/// Bounds of the per-tag search page size.
pub const TAG_SEARCH_LIMIT_RANGE: std::ops::RangeInclusive<usize> = 10..=15;

/// Which candidate strategy a summary run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStrategy {
    /// Expand the user's genre tags into similar artists.
    #[default]
    Tags,
    /// Ask a generative text model for artist names.
    Generative,
}

impl std::fmt::Display for RecommendationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationStrategy::Tags => write!(f, "tags"),
            RecommendationStrategy::Generative => write!(f, "generative"),
        }
    }
}

#[async_trait]
pub trait CandidateGenerator: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Propose artist names, best first.
    async fn propose(&self, frequency: &ArtistFrequency) -> Result<Vec<String>, SummaryError>;
}

/// Proposes artists that share the most common genre tags of the history.
pub struct TagExpansionGenerator {
    resolver: Arc<dyn MetadataResolver>,
    tag_search_limit: usize,
}

impl TagExpansionGenerator {
    pub fn new(resolver: Arc<dyn MetadataResolver>, tag_search_limit: usize) -> Self {
        Self {
            resolver,
            tag_search_limit: tag_search_limit
                .clamp(*TAG_SEARCH_LIMIT_RANGE.start(), *TAG_SEARCH_LIMIT_RANGE.end()),
        }
    }

    /// Tag tally across all known artists, most frequent first. Ties keep
    /// first-seen order.
    async fn tally_tags(&self, frequency: &ArtistFrequency) -> Vec<(String, usize)> {
        let mut tally: Vec<(String, usize)> = Vec::new();
        for (artist, _) in frequency.artists() {
            let Some(artist_ref) = self.resolver.resolve_artist(artist).await else {
                debug!("No metadata match for {}, skipping its tags", artist);
                continue;
            };
            for tag in self
                .resolver
                .get_top_tags(&artist_ref, TAGS_PER_ARTIST)
                .await
            {
                match tally.iter_mut().find(|(t, _)| *t == tag) {
                    Some((_, count)) => *count += 1,
                    None => tally.push((tag, 1)),
                }
            }
        }
        tally.sort_by(|a, b| b.1.cmp(&a.1));
        tally
    }
}

#[async_trait]
impl CandidateGenerator for TagExpansionGenerator {
    fn name(&self) -> &str {
        "tags"
    }

    async fn propose(&self, frequency: &ArtistFrequency) -> Result<Vec<String>, SummaryError> {
        let tally = self.tally_tags(frequency).await;
        let top_tags: Vec<&str> = tally
            .iter()
            .take(TOP_TAGS)
            .map(|(t, _)| t.as_str())
            .collect();
        info!("Expanding tags {:?} into candidates", top_tags);

        let known = frequency.known_artists();
        let mut proposed_lower: HashSet<String> = HashSet::new();
        let mut proposals: Vec<String> = Vec::new();

        'tags: for tag in top_tags {
            for name in self.resolver.search_by_tag(tag, self.tag_search_limit).await {
                let lower = name.to_lowercase();
                if known.contains(&lower) || proposed_lower.contains(&lower) {
                    continue;
                }
                proposed_lower.insert(lower);
                proposals.push(name);
                if proposals.len() >= TAG_PROPOSALS {
                    break 'tags;
                }
            }
        }

        if proposals.is_empty() {
            warn!("Tag expansion produced no candidates");
        }
        Ok(proposals)
    }
}

/// Asks a generative text model for artists similar to the history.
pub struct GenerativeTextGenerator {
    provider: Arc<dyn LlmProvider>,
    options: CompletionOptions,
}

impl GenerativeTextGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, options: CompletionOptions) -> Self {
        Self { provider, options }
    }

    pub fn build_prompt(frequency: &ArtistFrequency) -> String {
        let mut prompt = String::from("Based on this concert history:\n");
        for (artist, count) in frequency.artists() {
            prompt.push_str(&format!("- {} ({} {})\n", artist, count, concert_noun(count)));
        }
        prompt.push_str(
            "\nPlease recommend 5-7 real, popular music artists that someone with this concert \
             history might enjoy. Return ONLY a comma-separated list of artist names, no other text.",
        );
        prompt
    }

    pub fn parse_names(text: &str) -> Vec<String> {
        text.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

#[async_trait]
impl CandidateGenerator for GenerativeTextGenerator {
    fn name(&self) -> &str {
        "generative"
    }

    async fn propose(&self, frequency: &ArtistFrequency) -> Result<Vec<String>, SummaryError> {
        let prompt = Self::build_prompt(frequency);
        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            "Requesting generative candidates"
        );

        let response = self
            .provider
            .complete(&[Message::user(prompt)], &self.options)
            .await
            .map_err(|e| {
                warn!(provider = self.provider.name(), error = %e, "Generative request failed");
                SummaryError::UpstreamUnavailable(e.to_string())
            })?;

        let content = &response.message.content;
        let mut names = Self::parse_names(content);
        match response.finish_reason {
            FinishReason::Stop => {}
            FinishReason::ContentFilter => {
                warn!(provider = self.provider.name(), "Generative reply was filtered");
                return Err(SummaryError::UpstreamUnavailable(format!(
                    "{} filtered the reply",
                    self.provider.name()
                )));
            }
            // The last name may be cut mid-word
            FinishReason::MaxTokens if !content.trim_end().ends_with(',') => {
                let dropped = names.pop();
                warn!(dropped = ?dropped, "Generative reply hit the token limit");
            }
            FinishReason::MaxTokens => {}
        }
        if names.is_empty() {
            return Err(SummaryError::UpstreamUnavailable(format!(
                "{} returned no artist names",
                self.provider.name()
            )));
        }
        info!("Generative model proposed {} candidates", names.len());
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concert_stats::fakes::{FakeLlm, FakeResolver};
    use crate::concert_stats::models::AttendanceEntry;
    use chrono::Utc;

    fn frequency(artists: &[&str]) -> ArtistFrequency {
        let entries: Vec<AttendanceEntry> = artists
            .iter()
            .enumerate()
            .map(|(i, a)| AttendanceEntry {
                id: format!("e{}", i),
                artist: a.to_string(),
                venue: "Venue".to_string(),
                date: Utc::now(),
            })
            .collect();
        ArtistFrequency::from_history(&entries)
    }

    fn metal_resolver() -> FakeResolver {
        FakeResolver::new()
            .with_artist(
                "Metallica",
                &["thrash metal", "heavy metal", "metal", "rock", "american"],
            )
            .with_tag_artists(
                "thrash metal",
                &["Metallica", "Megadeth", "metallica", "Slayer", "Anthrax"],
            )
            .with_tag_artists("heavy metal", &["Iron Maiden", "Judas Priest"])
    }

    #[tokio::test]
    async fn test_tag_expansion_skips_known_and_stops_at_three() {
        let resolver = Arc::new(metal_resolver());
        let generator = TagExpansionGenerator::new(resolver.clone(), 15);

        let proposals = generator.propose(&frequency(&["Metallica"])).await.unwrap();

        assert_eq!(proposals, vec!["Megadeth", "Slayer", "Anthrax"]);
        // Stopped inside the first tag, the second one was never searched
        let searches = resolver.tag_searches.lock().unwrap().clone();
        assert_eq!(searches, vec![("thrash metal".to_string(), 15)]);
    }

    #[tokio::test]
    async fn test_tag_expansion_continues_into_next_tags() {
        let resolver = Arc::new(
            FakeResolver::new()
                .with_artist("Metallica", &["thrash metal", "heavy metal"])
                .with_tag_artists("thrash metal", &["Metallica", "Megadeth"])
                .with_tag_artists("heavy metal", &["MEGADETH", "Iron Maiden", "Judas Priest"]),
        );
        let generator = TagExpansionGenerator::new(resolver, 15);

        let proposals = generator.propose(&frequency(&["Metallica"])).await.unwrap();
        assert_eq!(proposals, vec!["Megadeth", "Iron Maiden", "Judas Priest"]);
    }

    #[tokio::test]
    async fn test_tag_tally_orders_by_frequency_then_first_seen() {
        let resolver = Arc::new(
            FakeResolver::new()
                .with_artist("Radiohead", &["alternative rock", "electronic", "british"])
                .with_artist("Nirvana", &["grunge", "alternative rock", "rock"])
                .with_artist("Pixies", &["rock", "alternative rock", "indie"]),
        );
        let generator = TagExpansionGenerator::new(resolver, 15);

        let tally = generator
            .tally_tags(&frequency(&["Radiohead", "Nirvana", "Pixies", "Radiohead"]))
            .await;
        let top: Vec<(&str, usize)> = tally
            .iter()
            .take(3)
            .map(|(t, c)| (t.as_str(), *c))
            .collect();
        assert_eq!(
            top,
            vec![("alternative rock", 3), ("rock", 2), ("electronic", 1)]
        );
    }

    #[tokio::test]
    async fn test_tag_expansion_with_unresolvable_history_is_empty() {
        let resolver = Arc::new(FakeResolver::new());
        let generator = TagExpansionGenerator::new(resolver, 15);
        let proposals = generator
            .propose(&frequency(&["Unknown Garage Band"]))
            .await
            .unwrap();
        assert!(proposals.is_empty());
    }

    #[test]
    fn test_tag_search_limit_is_clamped() {
        let resolver: Arc<dyn MetadataResolver> = Arc::new(FakeResolver::new());
        assert_eq!(TagExpansionGenerator::new(resolver.clone(), 100).tag_search_limit, 15);
        assert_eq!(TagExpansionGenerator::new(resolver, 1).tag_search_limit, 10);
    }

    #[test]
    fn test_prompt_lists_counts_with_plurals() {
        let prompt =
            GenerativeTextGenerator::build_prompt(&frequency(&["Radiohead", "Nirvana", "Radiohead"]));
        assert_eq!(
            prompt,
            "Based on this concert history:\n\
             - Radiohead (2 concerts)\n\
             - Nirvana (1 concert)\n\
             \n\
             Please recommend 5-7 real, popular music artists that someone with this concert \
             history might enjoy. Return ONLY a comma-separated list of artist names, no other text."
        );
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            GenerativeTextGenerator::parse_names(" Megadeth,Slayer , ,Anthrax,\n"),
            vec!["Megadeth", "Slayer", "Anthrax"]
        );
        assert!(GenerativeTextGenerator::parse_names(" , ").is_empty());
    }

    #[tokio::test]
    async fn test_generative_sends_prompt_and_parses_reply() {
        let llm = Arc::new(FakeLlm::replying("Iron Maiden, Megadeth, Judas Priest"));
        let generator = GenerativeTextGenerator::new(llm.clone(), CompletionOptions::default());

        let proposals = generator.propose(&frequency(&["Metallica"])).await.unwrap();
        assert_eq!(proposals, vec!["Iron Maiden", "Megadeth", "Judas Priest"]);

        let prompts = llm.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- Metallica (1 concert)\n"));
    }

    #[tokio::test]
    async fn test_generative_upstream_failure() {
        let generator = GenerativeTextGenerator::new(
            Arc::new(FakeLlm::unreachable()),
            CompletionOptions::default(),
        );
        let err = generator.propose(&frequency(&["Metallica"])).await.unwrap_err();
        assert!(matches!(err, SummaryError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_generative_truncated_reply_drops_last_name() {
        let llm = FakeLlm::replying("Iron Maiden, Megadeth, Judas Pr").finishing(FinishReason::MaxTokens);
        let generator = GenerativeTextGenerator::new(Arc::new(llm), CompletionOptions::default());
        let proposals = generator.propose(&frequency(&["Metallica"])).await.unwrap();
        assert_eq!(proposals, vec!["Iron Maiden", "Megadeth"]);

        let llm = FakeLlm::replying("Iron Maiden, Megadeth,").finishing(FinishReason::MaxTokens);
        let generator = GenerativeTextGenerator::new(Arc::new(llm), CompletionOptions::default());
        let proposals = generator.propose(&frequency(&["Metallica"])).await.unwrap();
        assert_eq!(proposals, vec!["Iron Maiden", "Megadeth"]);

        let llm = FakeLlm::replying("Iron Mai").finishing(FinishReason::MaxTokens);
        let generator = GenerativeTextGenerator::new(Arc::new(llm), CompletionOptions::default());
        let err = generator.propose(&frequency(&["Metallica"])).await.unwrap_err();
        assert!(matches!(err, SummaryError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_generative_filtered_reply_is_upstream_failure() {
        let llm = FakeLlm::replying("Iron Maiden").finishing(FinishReason::ContentFilter);
        let generator = GenerativeTextGenerator::new(Arc::new(llm), CompletionOptions::default());
        let err = generator.propose(&frequency(&["Metallica"])).await.unwrap_err();
        assert!(matches!(err, SummaryError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_generative_blank_reply_is_upstream_failure() {
        let generator =
            GenerativeTextGenerator::new(Arc::new(FakeLlm::replying(" ,, ")), CompletionOptions::default());
        let err = generator.propose(&frequency(&["Metallica"])).await.unwrap_err();
        assert!(matches!(err, SummaryError::UpstreamUnavailable(_)));
    }
}
