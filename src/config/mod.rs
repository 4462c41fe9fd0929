mod file_config;

pub use file_config::{FileConfig, LlmConfig, MusicBrainzConfig, RecommendationsConfig};

use crate::concert_stats::RecommendationStrategy;
use crate::llm::{CompletionOptions, LlmProviderKind, DEFAULT_GEMINI_MODEL, GEMINI_API_BASE};
use crate::metadata::{user_agent_header, MUSICBRAINZ_API_BASE};
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("venu-stats/", env!("CARGO_PKG_VERSION"));
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub strategy: Option<RecommendationStrategy>,
    pub musicbrainz_user_agent: Option<String>,
    pub musicbrainz_contact: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub musicbrainz: MusicBrainzSettings,
    pub recommendations: RecommendationSettings,
    pub llm: LlmSettings,
}

/// Settings for the MusicBrainz client.
#[derive(Debug, Clone)]
pub struct MusicBrainzSettings {
    pub base_url: String,
    /// Full `User-Agent` header value, contact included.
    pub user_agent: String,
    pub timeout_secs: u64,
    pub min_request_interval_ms: u64,
}

impl Default for MusicBrainzSettings {
    fn default() -> Self {
        Self {
            base_url: MUSICBRAINZ_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            min_request_interval_ms: 1100,
        }
    }
}

impl MusicBrainzSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationSettings {
    pub strategy: RecommendationStrategy,
    pub tag_search_limit: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            strategy: RecommendationStrategy::Tags,
            tag_search_limit: 15,
        }
    }
}

/// Settings for the LLM provider.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: LlmProviderKind,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::Gemini,
            base_url: GEMINI_API_BASE.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: None,
            temperature: 0.7,
            max_output_tokens: 3000,
            timeout_secs: 60,
        }
    }
}

impl LlmSettings {
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: self.temperature,
            max_tokens: Some(self.max_output_tokens),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        Self::resolve_with_env(cli, file_config, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::resolve`], reading environment fallbacks through `env`.
    pub fn resolve_with_env<F>(cli: &CliConfig, file_config: Option<FileConfig>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let mb_file = file.musicbrainz.unwrap_or_default();
        let mb_defaults = MusicBrainzSettings::default();
        let client_id = mb_file
            .user_agent
            .or_else(|| cli.musicbrainz_user_agent.clone())
            .unwrap_or(mb_defaults.user_agent);
        let contact = mb_file
            .contact
            .or_else(|| cli.musicbrainz_contact.clone());
        let musicbrainz = MusicBrainzSettings {
            base_url: mb_file.base_url.unwrap_or(mb_defaults.base_url),
            user_agent: user_agent_header(&client_id, contact.as_deref()),
            timeout_secs: mb_file.timeout_secs.unwrap_or(mb_defaults.timeout_secs),
            min_request_interval_ms: mb_file
                .min_request_interval_ms
                .unwrap_or(mb_defaults.min_request_interval_ms),
        };

        let recs_file = file.recommendations.unwrap_or_default();
        let recs_defaults = RecommendationSettings::default();
        let recommendations = RecommendationSettings {
            strategy: recs_file
                .strategy
                .or(cli.strategy)
                .unwrap_or(recs_defaults.strategy),
            tag_search_limit: recs_file
                .tag_search_limit
                .unwrap_or(recs_defaults.tag_search_limit),
        };

        let llm_file = file.llm.unwrap_or_default();
        let llm_defaults = LlmSettings::default();
        let provider = llm_file.provider.unwrap_or(llm_defaults.provider);
        let (default_base_url, default_model, key_var) = match provider {
            LlmProviderKind::Gemini => (
                GEMINI_API_BASE.to_string(),
                env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                "GEMINI_API_KEY",
            ),
            LlmProviderKind::OpenAI => (
                OPENAI_API_BASE.to_string(),
                DEFAULT_OPENAI_MODEL.to_string(),
                "OPENAI_API_KEY",
            ),
        };
        let llm = LlmSettings {
            provider,
            base_url: llm_file.base_url.unwrap_or(default_base_url),
            model: llm_file.model.unwrap_or(default_model),
            api_key: llm_file
                .api_key
                .or_else(|| env(key_var))
                .filter(|k| !k.trim().is_empty()),
            temperature: llm_file.temperature.unwrap_or(llm_defaults.temperature),
            max_output_tokens: llm_file
                .max_output_tokens
                .unwrap_or(llm_defaults.max_output_tokens),
            timeout_secs: llm_file.timeout_secs.unwrap_or(llm_defaults.timeout_secs),
        };

        // Self-hosted OpenAI-compatible endpoints may run without a key.
        let key_required = match llm.provider {
            LlmProviderKind::Gemini => true,
            LlmProviderKind::OpenAI => llm.base_url.trim_end_matches('/') == OPENAI_API_BASE,
        };
        if recommendations.strategy == RecommendationStrategy::Generative
            && key_required
            && llm.api_key.is_none()
        {
            bail!(
                "Generative recommendations with {} need [llm] api_key or {}",
                llm.provider,
                key_var
            );
        }

        Ok(Self {
            db_dir,
            musicbrainz,
            recommendations,
            llm,
        })
    }

    pub fn stats_db_path(&self) -> PathBuf {
        self.db_dir.join("stats.db")
    }

    pub fn concerts_db_path(&self) -> PathBuf {
        self.db_dir.join("concerts.db")
    }

    pub fn albums_db_path(&self) -> PathBuf {
        self.db_dir.join("albums.db")
    }
}
