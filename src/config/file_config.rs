use crate::concert_stats::RecommendationStrategy;
use crate::llm::LlmProviderKind;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub db_dir: Option<String>,

    pub musicbrainz: Option<MusicBrainzConfig>,
    pub recommendations: Option<RecommendationsConfig>,
    pub llm: Option<LlmConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct MusicBrainzConfig {
    pub base_url: Option<String>,
    /// Client identifier, e.g. "venu-stats/0.1.0".
    pub user_agent: Option<String>,
    /// Contact URL or email appended to the user agent.
    pub contact: Option<String>,
    pub timeout_secs: Option<u64>,
    pub min_request_interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RecommendationsConfig {
    pub strategy: Option<RecommendationStrategy>,
    pub tag_search_limit: Option<usize>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Option<LlmProviderKind>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
