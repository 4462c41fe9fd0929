use super::trait_def::StatsStoreError;
use thiserror::Error;

/// Failures of a summary run. Nothing is persisted when one of these is returned.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Stats record not found for user")]
    NotInitialized,

    #[error("User has no concert history")]
    EmptyHistory,

    #[error("Recommendation service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Could not validate any recommendations")]
    NoValidatedRecommendations,

    #[error("Failed to persist summary: {0}")]
    PersistenceFailure(String),
}

impl From<StatsStoreError> for SummaryError {
    fn from(e: StatsStoreError) -> Self {
        match e {
            StatsStoreError::NotInitialized(_) => SummaryError::NotInitialized,
            other => SummaryError::PersistenceFailure(other.to_string()),
        }
    }
}
