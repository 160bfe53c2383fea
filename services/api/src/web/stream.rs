//! services/api/src/web/stream.rs
//!
//! Axum handlers for the two SSE generation endpoints. Validation failures
//! are rejected with a plain 400 JSON body before any stream is opened; once
//! the response has started, failures travel in-band as `error` events.

use crate::web::protocol::{ErrorBody, SummaryEvent, TranslationEvent};
use crate::web::relay::{relay_events, RelayEvent};
use crate::web::state::AppState;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use briefing_core::domain::TranslationLanguage;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

//=========================================================================================
// Request Payloads
//=========================================================================================

/// Fields are optional so that a missing field yields the endpoint's own 400
/// message rather than a generic deserialization rejection.
#[derive(Deserialize, ToSchema)]
pub struct SummaryStreamRequest {
    #[serde(default, rename = "documentText")]
    pub document_text: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct TranslationStreamRequest {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

type StreamRejection = (StatusCode, Json<ErrorBody>);

fn bad_request(message: &str) -> StreamRejection {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message)))
}

//=========================================================================================
// SSE Handlers
//=========================================================================================

/// Stream an AI-generated summary of a legal document.
///
/// Emits `progress` events carrying complete replacement snapshots of the
/// summary, then a single `done` event with the final text.
#[utoipa::path(
    post,
    path = "/api/summary/stream",
    request_body = SummaryStreamRequest,
    responses(
        (status = 200, description = "An SSE stream of summary events", content_type = "text/event-stream"),
        (status = 400, description = "documentText is missing or blank", body = ErrorBody)
    ),
    tag = "streams"
)]
pub async fn summary_stream_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SummaryStreamRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StreamRejection> {
    let document_text = payload
        .document_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| bad_request("documentText is required."))?;

    let snapshots = state
        .summary_adapter
        .summarize_streaming(&document_text)
        .await
        .map_err(|e| {
            error!("Failed to start summary generation: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("Failed to start summary generation.")),
            )
        })?;

    let events = relay_events(snapshots).map(|event| {
        let wire = match event {
            RelayEvent::Progress(summary) => SummaryEvent::Progress { summary },
            RelayEvent::Done(summary) => SummaryEvent::Done { summary },
            RelayEvent::Error(message) => SummaryEvent::Error { message },
        };
        Ok(Event::default().data(serde_json::to_string(&wire).unwrap()))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Stream a translation of an already-generated summary.
///
/// Only Hindi and Telugu are offered; any other `language` value is rejected
/// before the stream opens. Markdown structure in the summary is preserved
/// by the translation.
#[utoipa::path(
    post,
    path = "/api/translation/stream",
    request_body = TranslationStreamRequest,
    responses(
        (status = 200, description = "An SSE stream of translation events", content_type = "text/event-stream"),
        (status = 400, description = "summary is missing or the language is unsupported", body = ErrorBody)
    ),
    tag = "streams"
)]
pub async fn translation_stream_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranslationStreamRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StreamRejection> {
    let summary = payload
        .summary
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| bad_request("summary is required."))?;

    let language = payload
        .language
        .as_deref()
        .and_then(TranslationLanguage::from_request_value)
        .ok_or_else(|| bad_request("Unsupported language."))?;

    let snapshots = state
        .translation_adapter
        .translate_streaming(&summary, language)
        .await
        .map_err(|e| {
            error!("Failed to start translation: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("Failed to start translation.")),
            )
        })?;

    let events = relay_events(snapshots).map(|event| {
        let wire = match event {
            RelayEvent::Progress(translation) => TranslationEvent::Progress { translation },
            RelayEvent::Done(translation) => TranslationEvent::Done { translation },
            RelayEvent::Error(message) => TranslationEvent::Error { message },
        };
        Ok(Event::default().data(serde_json::to_string(&wire).unwrap()))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_document_text_deserializes_to_none() {
        let req: SummaryStreamRequest = serde_json::from_str("{}").unwrap();
        assert!(req.document_text.is_none());
    }

    #[test]
    fn camel_case_field_name_is_accepted() {
        let req: SummaryStreamRequest =
            serde_json::from_str(r#"{"documentText":"Clause 1."}"#).unwrap();
        assert_eq!(req.document_text.as_deref(), Some("Clause 1."));
    }

    #[test]
    fn translation_request_tolerates_missing_fields() {
        let req: TranslationStreamRequest = serde_json::from_str(r#"{"summary":"x"}"#).unwrap();
        assert_eq!(req.summary.as_deref(), Some("x"));
        assert!(req.language.is_none());
    }
}
