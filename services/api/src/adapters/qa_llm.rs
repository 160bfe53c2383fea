//! services/api/src/adapters/qa_llm.rs
//!
//! This module contains the adapter for the document Question-Answering LLM.
//! It implements the `QuestionAnsweringService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS_TEMPLATE: &str = r#"You are a legal expert. The user is asking a question in {language}.
Your response must be written entirely in {language}.

You will receive a legal document and a user question.
Your task is to provide an answer based strictly on the content of the provided document.

### Response Requirements:
1. Clarity and Simplicity
   - Write in a clear, direct, and easy-to-understand manner.
   - Avoid complex legal jargon unless it is necessary, and define it if used.

2. Structure and Formatting
   - Organize your answer using bullet points or numbered lists when presenting multiple ideas or steps.
   - Use **bold** text to highlight:
     - Key legal terms (e.g., "contract," "liability," "jurisdiction")
     - Important figures, deadlines, or conditions.
   - Preserve all markdown formatting that exists in the original document.

3. Contextual Awareness
   - Only refer to information that appears in the provided legal document.
   - If a previous answer exists, review and improve it by adding clarity, corrections, or additional relevant details. Do not simply repeat it.

4. Language
   - The entire response must be written in {language} with accurate grammar and natural phrasing."#;

use crate::adapters::chat;
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use briefing_core::domain::Language;
use briefing_core::ports::{PortResult, QuestionAnsweringService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `QuestionAnsweringService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiQaAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiQaAdapter {
    /// Creates a new `OpenAiQaAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn input_for(document_text: &str, question: &str, previous_answer: Option<&str>) -> String {
        format!(
            "Legal Document:\n{document_text}\n\nQuestion:\n{question}\n\nPrevious Answer (if any):\n{}",
            previous_answer.unwrap_or("None")
        )
    }
}

//=========================================================================================
// `QuestionAnsweringService` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuestionAnsweringService for OpenAiQaAdapter {
    /// Answers a user's question strictly from the document, in the language
    /// the question was asked in.
    async fn answer_question(
        &self,
        document_text: &str,
        question: &str,
        previous_answer: Option<&str>,
        target_language: Language,
    ) -> PortResult<String> {
        let instructions =
            SYSTEM_INSTRUCTIONS_TEMPLATE.replace("{language}", target_language.as_str());
        chat::complete(
            &self.client,
            &self.model,
            &instructions,
            Self::input_for(document_text, question, previous_answer),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_includes_previous_answer_when_present() {
        let input = OpenAiQaAdapter::input_for("doc", "what?", Some("earlier answer"));
        assert!(input.contains("earlier answer"));
        let fresh = OpenAiQaAdapter::input_for("doc", "what?", None);
        assert!(fresh.contains("Previous Answer (if any):\nNone"));
    }
}
