//! Text generation providers used by the generative recommendation strategy.

mod gemini;
mod openai;
mod provider;
mod types;

pub use gemini::{GeminiProvider, DEFAULT_GEMINI_MODEL, GEMINI_API_BASE};
pub use openai::OpenAIProvider;
pub use provider::{CompletionOptions, LlmError, LlmProvider};
pub use types::{CompletionResponse, FinishReason, Message, MessageRole};

use crate::config::LlmSettings;
use anyhow::{bail, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Backend selected by `[llm] provider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    #[default]
    Gemini,
    /// Any OpenAI-compatible chat completions endpoint.
    #[value(name = "openai")]
    #[serde(rename = "openai")]
    OpenAI,
}

impl std::fmt::Display for LlmProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderKind::Gemini => write!(f, "gemini"),
            LlmProviderKind::OpenAI => write!(f, "openai"),
        }
    }
}

/// Build the configured provider.
///
/// Gemini refuses to start without an API key.
pub fn create_llm_provider(settings: &LlmSettings) -> Result<Arc<dyn LlmProvider>> {
    match settings.provider {
        LlmProviderKind::Gemini => {
            let Some(api_key) = settings.api_key.clone() else {
                bail!("Gemini provider requires an API key ([llm] api_key or GEMINI_API_KEY)");
            };
            info!(
                "Using Gemini provider at {} with model {}",
                settings.base_url, settings.model
            );
            Ok(Arc::new(GeminiProvider::new(
                &settings.base_url,
                &settings.model,
                api_key,
            )))
        }
        LlmProviderKind::OpenAI => {
            info!(
                "Using OpenAI-compatible provider at {} with model {}",
                settings.base_url, settings.model
            );
            Ok(Arc::new(OpenAIProvider::new(
                &settings.base_url,
                &settings.model,
                settings.api_key.clone(),
            )))
        }
    }
}
