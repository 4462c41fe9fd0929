//! Per-user attendance history, summaries and artist recommendations.

mod candidates;
mod error;
mod factory;
mod frequency;
mod models;
mod schema;
mod store;
mod synthesizer;
mod trait_def;
mod validator;

#[cfg(test)]
mod fakes;

pub use candidates::{
    CandidateGenerator, GenerativeTextGenerator, RecommendationStrategy, TagExpansionGenerator,
};
pub use error::SummaryError;
pub use factory::create_candidate_generator;
pub use frequency::ArtistFrequency;
pub use models::{AttendanceEntry, RecordState, StatsRecord};
pub use store::SqliteStatsStore;
pub use synthesizer::{SummaryOutcome, SummarySynthesizer};
pub use trait_def::{StatsResult, StatsStore, StatsStoreError};
pub use validator::{RecommendationCandidate, RecommendationValidator, MAX_RECOMMENDATIONS};
