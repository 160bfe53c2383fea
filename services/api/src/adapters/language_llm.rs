//! services/api/src/adapters/language_llm.rs
//!
//! This module contains the adapter for language detection.
//! It implements the `LanguageDetectionService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = "Detect the language of the text you receive. \
The possible languages are English, Hindi, and Telugu. \
Respond with EXACTLY ONE WORD: English, Hindi, Telugu, or Unknown if you cannot determine the language.";

use crate::adapters::chat;
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use briefing_core::domain::Language;
use briefing_core::ports::{LanguageDetectionService, PortResult};

/// An adapter that implements `LanguageDetectionService` using an
/// OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiLanguageAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiLanguageAdapter {
    /// Creates a new `OpenAiLanguageAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl LanguageDetectionService for OpenAiLanguageAdapter {
    async fn detect_language(&self, text: &str) -> PortResult<Language> {
        let label = chat::complete(
            &self.client,
            &self.model,
            SYSTEM_INSTRUCTIONS,
            format!("Text: {text}"),
        )
        .await?;
        // Off-list labels intentionally collapse into Unknown, which blocks
        // further processing upstream.
        Ok(Language::from_label(&label))
    }
}
