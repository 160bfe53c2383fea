//! services/api/src/adapters/chat.rs
//!
//! Shared plumbing for the chat-completion adapters: a single-shot call that
//! returns the first choice's text, and a streaming call that adapts the
//! provider's delta stream into full replacement snapshots.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use briefing_core::ports::{PortError, PortResult, SnapshotStream};
use futures::StreamExt;

/// One blocking completion; fails with `Generation` if the remote call
/// errors or returns no text content.
pub(crate) async fn complete(
    client: &Client<OpenAIConfig>,
    model: &str,
    instructions: &str,
    input: String,
) -> PortResult<String> {
    let messages = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(instructions)
            .build()
            .map_err(|e| PortError::Generation(e.to_string()))?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(input)
            .build()
            .map_err(|e| PortError::Generation(e.to_string()))?
            .into(),
    ];

    let request = CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages(messages)
        .n(1)
        .build()
        .map_err(|e| PortError::Generation(e.to_string()))?;

    // Call the API and manually map the error, which respects the orphan rule.
    let response = client
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
            PortError::Generation("The model returned no text content.".to_string())
        })
}

/// A streaming completion. The provider emits append-only deltas; each item
/// of the returned stream is the full accumulated text so far, so consumers
/// see complete replacement snapshots rather than fragments.
pub(crate) async fn complete_streaming(
    client: &Client<OpenAIConfig>,
    model: &str,
    instructions: &str,
    input: String,
) -> PortResult<SnapshotStream> {
    let messages = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(instructions)
            .build()
            .map_err(|e| PortError::Generation(e.to_string()))?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(input)
            .build()
            .map_err(|e| PortError::Generation(e.to_string()))?
            .into(),
    ];

    let request = CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages(messages)
        .n(1)
        .stream(true)
        .build()
        .map_err(|e| PortError::Generation(e.to_string()))?;

    let mut deltas = client
        .chat()
        .create_stream(request)
        .await
        .map_err(|e: OpenAIError| PortError::Generation(e.to_string()))?;

    let snapshots = async_stream::try_stream! {
        let mut accumulated = String::new();
        while let Some(next) = deltas.next().await {
            let response = next.map_err(|e| PortError::Generation(e.to_string()))?;
            let Some(delta) = response
                .choices
                .first()
                .and_then(|choice| choice.delta.content.as_deref())
            else {
                continue;
            };
            accumulated.push_str(delta);
            yield accumulated.clone();
        }
    };

    Ok(Box::pin(snapshots))
}
