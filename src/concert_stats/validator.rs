//! Checks proposed names against the metadata service and the user's history.

use super::error::SummaryError;
use super::frequency::ArtistFrequency;
use crate::metadata::MetadataResolver;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

pub const MAX_RECOMMENDATIONS: usize = 3;

/// A proposed name the metadata service confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationCandidate {
    pub proposed: String,
    pub canonical: String,
}

pub struct RecommendationValidator {
    resolver: Arc<dyn MetadataResolver>,
    max_accepted: usize,
}

impl RecommendationValidator {
    pub fn new(resolver: Arc<dyn MetadataResolver>) -> Self {
        Self {
            resolver,
            max_accepted: MAX_RECOMMENDATIONS,
        }
    }

    /// Resolve candidates in order, keeping canonical names that are neither in
    /// the history nor already accepted (both case-insensitive).
    ///
    /// Returns between 1 and [`MAX_RECOMMENDATIONS`] entries, or
    /// [`SummaryError::NoValidatedRecommendations`].
    pub async fn validate(
        &self,
        candidates: &[String],
        frequency: &ArtistFrequency,
    ) -> Result<Vec<RecommendationCandidate>, SummaryError> {
        let known = frequency.known_artists();
        let mut accepted_lower: HashSet<String> = HashSet::new();
        let mut accepted: Vec<RecommendationCandidate> = Vec::new();

        for proposed in candidates {
            if accepted.len() >= self.max_accepted {
                break;
            }
            let Some(artist) = self.resolver.resolve_artist(proposed).await else {
                debug!("Dropping {}: not found in metadata service", proposed);
                continue;
            };
            let lower = artist.name.to_lowercase();
            if known.contains(&lower) {
                debug!("Dropping {}: already in history as {}", proposed, artist.name);
                continue;
            }
            if !accepted_lower.insert(lower) {
                debug!("Dropping {}: duplicate of {}", proposed, artist.name);
                continue;
            }
            accepted.push(RecommendationCandidate {
                proposed: proposed.clone(),
                canonical: artist.name,
            });
        }

        if accepted.is_empty() {
            return Err(SummaryError::NoValidatedRecommendations);
        }
        info!(
            "Validated {} of {} candidates",
            accepted.len(),
            candidates.len()
        );
        Ok(accepted)
    }
}
