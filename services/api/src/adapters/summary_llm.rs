//! services/api/src/adapters/summary_llm.rs
//!
//! This module contains the adapter for the legal-document summarization LLM.
//! It implements the `SummarizationService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"You are a legal expert skilled at simplifying complex legal documents.
Your task is to summarize the legal document you receive so that a non-expert can easily understand its content.

### Summary Requirements:
1. Clarity and Simplicity
   - Write in clear, concise, and plain language.
   - Avoid or explain any legal jargon or complex terms.

2. Structure and Readability
   - Organize the summary using headings and subheadings.
   - Use bullet points or numbered lists to outline:
     - Key clauses
     - Main obligations
     - Important dates or deadlines

3. Content Focus
   - Clearly specify each party's **main rights and obligations**.
   - Highlight important conditions, limitations, or penalties if mentioned.
   - Avoid interpretation beyond the text. Summarize only what is stated in the document.

4. Formatting
   - Use **bold** text to emphasize key terms, section titles, and important details.
   - Maintain logical flow so the summary is easy to follow."#;

use crate::adapters::chat;
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use briefing_core::ports::{PortResult, SnapshotStream, SummarizationService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SummarizationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiSummaryAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiSummaryAdapter {
    /// Creates a new `OpenAiSummaryAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn input_for(document_text: &str) -> String {
        format!("Here is the legal document to summarize:\n\n{document_text}")
    }
}

//=========================================================================================
// `SummarizationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummarizationService for OpenAiSummaryAdapter {
    async fn summarize(&self, document_text: &str) -> PortResult<String> {
        chat::complete(
            &self.client,
            &self.model,
            SYSTEM_INSTRUCTIONS,
            Self::input_for(document_text),
        )
        .await
    }

    async fn summarize_streaming(&self, document_text: &str) -> PortResult<SnapshotStream> {
        chat::complete_streaming(
            &self.client,
            &self.model,
            SYSTEM_INSTRUCTIONS,
            Self::input_for(document_text),
        )
        .await
    }
}
