//! Factory function for creating the configured candidate generator

use super::candidates::{
    CandidateGenerator, GenerativeTextGenerator, RecommendationStrategy, TagExpansionGenerator,
};
use crate::config::LlmSettings;
use crate::llm::create_llm_provider;
use crate::metadata::MetadataResolver;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Create a candidate generator for the selected strategy.
///
/// # Arguments
/// * `strategy` - Which generator to build
/// * `resolver` - Metadata resolver shared with the validator
/// * `tag_search_limit` - Page size for tag searches (tag strategy only)
/// * `llm` - Provider settings (generative strategy only)
pub fn create_candidate_generator(
    strategy: RecommendationStrategy,
    resolver: Arc<dyn MetadataResolver>,
    tag_search_limit: usize,
    llm: &LlmSettings,
) -> Result<Box<dyn CandidateGenerator>> {
    match strategy {
        RecommendationStrategy::Tags => {
            info!(
                "Creating tag expansion generator (page size {})",
                tag_search_limit
            );
            Ok(Box::new(TagExpansionGenerator::new(
                resolver,
                tag_search_limit,
            )))
        }
        RecommendationStrategy::Generative => {
            info!("Creating generative text generator ({})", llm.provider);
            let provider = create_llm_provider(llm)
                .context("Generative recommendations need a working LLM provider")?;
            Ok(Box::new(GenerativeTextGenerator::new(
                provider,
                llm.completion_options(),
            )))
        }
    }
}
