//! crates/briefing_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like databases
//! or remote AI APIs.

use crate::domain::{BriefingRecord, Language, TranslationLanguage};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by all port operations.
///
/// Request-boundary validation failures (`InvalidInput`, `UnsupportedType`)
/// are rejected with 4xx before any streaming starts; failures after a stream
/// has started become in-band `error` events instead.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Malformed or missing request fields; the user must correct their input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The declared media type is not one the decoder supports.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    /// The decoder dispatched successfully but produced nothing usable.
    #[error("No text could be extracted from the file")]
    ExtractionEmpty,
    /// The remote AI call failed or returned no parseable output.
    #[error("Generation failed: {0}")]
    Generation(String),
    /// No valid session for a privileged operation.
    #[error("Unauthorized")]
    Unauthorized,
    /// The persistence layer is missing its schema. Kept distinct from
    /// `Storage` so the handler can surface the migration diagnostic.
    #[error("Storage schema missing: {0}")]
    MissingSchema(String),
    /// Generic persistence-layer failure.
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// A lazy, finite, non-restartable sequence of generation snapshots.
///
/// Each item is the generation's complete current output (a replacement, not
/// a delta); consumers must tolerate wholly revised content between items.
/// Dropping the stream aborts the underlying remote call; snapshots already
/// delivered remain valid and are never retried.
pub type SnapshotStream = Pin<Box<dyn Stream<Item = PortResult<String>> + Send>>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait SummarizationService: Send + Sync {
    /// Produces the final summary in one blocking call.
    async fn summarize(&self, document_text: &str) -> PortResult<String>;

    /// Produces the summary as a sequence of growing snapshots.
    async fn summarize_streaming(&self, document_text: &str) -> PortResult<SnapshotStream>;
}

#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translates a summary in one blocking call.
    async fn translate(&self, summary: &str, language: TranslationLanguage)
        -> PortResult<String>;

    /// Translates a summary as a sequence of growing snapshots.
    async fn translate_streaming(
        &self,
        summary: &str,
        language: TranslationLanguage,
    ) -> PortResult<SnapshotStream>;
}

#[async_trait]
pub trait QuestionAnsweringService: Send + Sync {
    /// Answers a question strictly from the document's content, written in
    /// `target_language`. A previous answer, when present, is to be improved
    /// upon rather than repeated.
    async fn answer_question(
        &self,
        document_text: &str,
        question: &str,
        previous_answer: Option<&str>,
        target_language: Language,
    ) -> PortResult<String>;
}

#[async_trait]
pub trait LanguageDetectionService: Send + Sync {
    /// Classifies text as English, Hindi, or Telugu; `Unknown` otherwise.
    async fn detect_language(&self, text: &str) -> PortResult<Language>;
}

#[async_trait]
pub trait VisionExtractionService: Send + Sync {
    /// Best-effort transcription of a file the structural extractors could
    /// not handle, using a general vision/text model.
    async fn transcribe(&self, mime_type: &str, data_uri: &str) -> PortResult<String>;
}

#[async_trait]
pub trait BriefingStore: Send + Sync {
    /// Persists one briefing-history row and returns it with generated fields.
    async fn save_briefing(
        &self,
        user_id: Uuid,
        file_name: &str,
        summary: Option<&str>,
    ) -> PortResult<BriefingRecord>;

    /// Lists a user's briefings, newest first, capped at the 20 most recent.
    async fn list_briefings(&self, user_id: Uuid) -> PortResult<Vec<BriefingRecord>>;

    /// Resolves an auth session cookie value to a user id, or `Unauthorized`.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;
}
