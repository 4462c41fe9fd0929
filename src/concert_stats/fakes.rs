//! In-memory resolver and LLM doubles shared by the pipeline tests.

use crate::llm::{CompletionOptions, CompletionResponse, FinishReason, LlmError, LlmProvider, Message};
use crate::metadata::{ArtistRef, MetadataResolver};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeResolver {
    artists: HashMap<String, ArtistRef>,
    tags: HashMap<String, Vec<String>>,
    tag_artists: HashMap<String, Vec<String>>,
    pub(crate) tag_searches: Mutex<Vec<(String, usize)>>,
}

impl FakeResolver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a resolvable artist. Its canonical name is `name` as given.
    pub(crate) fn with_artist(mut self, name: &str, tags: &[&str]) -> Self {
        let id = format!("mbid-{}", name.to_lowercase().replace(' ', "-"));
        self.tags
            .insert(id.clone(), tags.iter().map(|t| t.to_string()).collect());
        self.artists.insert(
            name.to_lowercase(),
            ArtistRef {
                id,
                name: name.to_string(),
            },
        );
        self
    }

    pub(crate) fn with_tag_artists(mut self, tag: &str, names: &[&str]) -> Self {
        self.tag_artists
            .insert(tag.to_string(), names.iter().map(|n| n.to_string()).collect());
        self
    }
}

#[async_trait]
impl MetadataResolver for FakeResolver {
    async fn resolve_artist(&self, name: &str) -> Option<ArtistRef> {
        self.artists.get(&name.trim().to_lowercase()).cloned()
    }

    async fn get_top_tags(&self, artist: &ArtistRef, limit: usize) -> Vec<String> {
        self.tags
            .get(&artist.id)
            .map(|t| t.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    async fn search_by_tag(&self, tag: &str, limit: usize) -> Vec<String> {
        self.tag_searches
            .lock()
            .unwrap()
            .push((tag.to_string(), limit));
        self.tag_artists
            .get(tag)
            .map(|n| n.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }
}

pub(crate) struct FakeLlm {
    reply: Option<String>,
    finish_reason: FinishReason,
    pub(crate) prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub(crate) fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            finish_reason: FinishReason::Stop,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self {
            reply: None,
            finish_reason: FinishReason::Stop,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn finishing(mut self, finish_reason: FinishReason) -> Self {
        self.finish_reason = finish_reason;
        self
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn complete(
        &self,
        messages: &[Message],
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .extend(messages.iter().map(|m| m.content.clone()));
        match &self.reply {
            Some(text) => Ok(CompletionResponse {
                message: Message::assistant(text.clone()),
                finish_reason: self.finish_reason,
            }),
            None => Err(LlmError::Connection("connection refused".to_string())),
        }
    }
}
