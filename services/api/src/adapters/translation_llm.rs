//! services/api/src/adapters/translation_llm.rs
//!
//! This module contains the adapter for the summary-translation LLM.
//! It implements the `TranslationService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS_TEMPLATE: &str = r#"You are a professional legal translator.
Translate the summary of a legal document you receive into {language}.

### Translation Requirements:
1. Accuracy and Clarity
   - Translate all content **faithfully and clearly** into natural, fluent {language}.
   - Use **appropriate legal terminology** in {language} where relevant.
   - Do not add or omit any information.

2. Formatting Preservation
   - Preserve the **original markdown formatting exactly**:
     - Headings (using #)
     - Bullet points (using - or *)
     - Bold text (using **)
   - Do not change punctuation, numbering, or structure.

3. Tone and Readability
   - Maintain a **formal and professional tone** suitable for legal summaries.
   - Ensure the translation remains easy to read and understandable."#;

use crate::adapters::chat;
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use briefing_core::domain::TranslationLanguage;
use briefing_core::ports::{PortResult, SnapshotStream, TranslationService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TranslationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiTranslationAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiTranslationAdapter {
    /// Creates a new `OpenAiTranslationAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn instructions_for(language: TranslationLanguage) -> String {
        SYSTEM_INSTRUCTIONS_TEMPLATE.replace("{language}", language.as_str())
    }

    fn input_for(summary: &str) -> String {
        format!("Original Summary:\n\n{summary}")
    }
}

//=========================================================================================
// `TranslationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TranslationService for OpenAiTranslationAdapter {
    async fn translate(
        &self,
        summary: &str,
        language: TranslationLanguage,
    ) -> PortResult<String> {
        chat::complete(
            &self.client,
            &self.model,
            &Self::instructions_for(language),
            Self::input_for(summary),
        )
        .await
    }

    async fn translate_streaming(
        &self,
        summary: &str,
        language: TranslationLanguage,
    ) -> PortResult<SnapshotStream> {
        chat::complete_streaming(
            &self.client,
            &self.model,
            &Self::instructions_for(language),
            Self::input_for(summary),
        )
        .await
    }
}
