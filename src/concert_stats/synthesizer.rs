//! Summary generation: history in, persisted summary and recommendations out.

use super::candidates::CandidateGenerator;
use super::error::SummaryError;
use super::frequency::ArtistFrequency;
use super::models::RecordState;
use super::trait_def::StatsStore;
use super::validator::RecommendationValidator;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of a successful summary run, as persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOutcome {
    pub summary: String,
    /// Always 1 to 3 canonical artist names.
    pub recommendations: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

pub struct SummarySynthesizer {
    store: Arc<dyn StatsStore>,
    generator: Box<dyn CandidateGenerator>,
    validator: RecommendationValidator,
}

impl SummarySynthesizer {
    pub fn new(
        store: Arc<dyn StatsStore>,
        generator: Box<dyn CandidateGenerator>,
        validator: RecommendationValidator,
    ) -> Self {
        Self {
            store,
            generator,
            validator,
        }
    }

    pub fn strategy_name(&self) -> &str {
        self.generator.name()
    }

    pub fn record_state(&self, user_id: &str) -> Result<RecordState, SummaryError> {
        let record = self.store.get_record(user_id)?;
        Ok(RecordState::of(record.as_ref()))
    }

    /// Build the summary for a user's history, pick recommendations and store both.
    ///
    /// Nothing is written unless every step before the final update succeeds,
    /// so a failed run leaves the previous summary in place.
    pub async fn generate_summary(&self, user_id: &str) -> Result<SummaryOutcome, SummaryError> {
        let record = self
            .store
            .get_record(user_id)?
            .ok_or(SummaryError::NotInitialized)?;
        if record.history.is_empty() {
            return Err(SummaryError::EmptyHistory);
        }

        let frequency = ArtistFrequency::from_history(&record.history);
        let summary = frequency.summary_text();

        info!(
            "Generating summary for {} ({} entries) with {} strategy",
            user_id,
            frequency.total(),
            self.generator.name()
        );

        let candidates = self.generator.propose(&frequency).await.map_err(|e| {
            warn!("Candidate generation failed for {}: {}", user_id, e);
            e
        })?;
        let accepted = self.validator.validate(&candidates, &frequency).await?;
        let recommendations: Vec<String> = accepted.into_iter().map(|c| c.canonical).collect();

        let updated_at = self
            .store
            .save_summary(user_id, &summary, &recommendations)
            .map_err(|e| {
                error!("Failed to save summary for {}: {}", user_id, e);
                SummaryError::from(e)
            })?;

        Ok(SummaryOutcome {
            summary,
            recommendations,
            updated_at,
        })
    }
}
