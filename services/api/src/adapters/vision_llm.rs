//! services/api/src/adapters/vision_llm.rs
//!
//! This module contains the adapter for the AI-vision fallback transcriber.
//! It implements the `VisionExtractionService` port from the `core` crate:
//! when structural extraction cannot handle a file, the whole data URI is
//! handed to a general vision model for a best-effort transcription.

const TRANSCRIPTION_PROMPT: &str = "You are an expert at extracting text from documents. \
Please extract all the text from the following file. \
Return only the extracted text, with no commentary.";

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs,
        ImageUrlArgs,
    },
    Client,
};
use async_trait::async_trait;
use briefing_core::ports::{PortError, PortResult, VisionExtractionService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `VisionExtractionService` using an
/// OpenAI-compatible vision model.
#[derive(Clone)]
pub struct OpenAiVisionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiVisionAdapter {
    /// Creates a new `OpenAiVisionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `VisionExtractionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl VisionExtractionService for OpenAiVisionAdapter {
    async fn transcribe(&self, _mime_type: &str, data_uri: &str) -> PortResult<String> {
        let parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
            ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(TRANSCRIPTION_PROMPT)
                .build()
                .map_err(|e| PortError::Generation(e.to_string()))?
                .into(),
            ChatCompletionRequestMessageContentPartImageArgs::default()
                .image_url(
                    ImageUrlArgs::default()
                        .url(data_uri)
                        .build()
                        .map_err(|e| PortError::Generation(e.to_string()))?,
                )
                .build()
                .map_err(|e| PortError::Generation(e.to_string()))?
                .into(),
        ];

        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(parts)
            .build()
            .map_err(|e| PortError::Generation(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| PortError::Generation(e.to_string()))?;

        // Call the API and manually map the error, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Generation(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Generation("Failed to extract text from file.".to_string())
            })
    }
}
