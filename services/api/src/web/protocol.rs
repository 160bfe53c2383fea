//! services/api/src/web/protocol.rs
//!
//! Defines the SSE wire protocol between the API server and the browser for
//! the incremental summary and translation streams.
//!
//! Each event is serialized as one `data: <JSON>\n\n` frame whose JSON
//! carries a `type` discriminant plus the payload field for that stream
//! (`summary` or `translation`), or `message` for failures.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Events Sent on the Summary Stream
//=========================================================================================

/// The events emitted by the summary relay. Zero or more `progress`
/// snapshots, then exactly one terminal `done` or `error`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SummaryEvent {
    /// A complete replacement snapshot of the summary so far.
    Progress { summary: String },
    /// The terminal success event with the final summary.
    Done { summary: String },
    /// The terminal failure event. Emitted in-band because the response
    /// headers are already committed once streaming has started.
    Error { message: String },
}

//=========================================================================================
// Events Sent on the Translation Stream
//=========================================================================================

/// Same shape as [`SummaryEvent`], with `translation` as the payload field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TranslationEvent {
    Progress { translation: String },
    Done { translation: String },
    Error { message: String },
}

//=========================================================================================
// Plain JSON Error Body (4xx/5xx, Before Streaming Starts)
//=========================================================================================

/// The JSON body for request-boundary rejections and storage failures.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_events_serialize_with_a_type_tag() {
        let progress = SummaryEvent::Progress {
            summary: "draft".into(),
        };
        assert_eq!(
            serde_json::to_string(&progress).unwrap(),
            r#"{"type":"progress","summary":"draft"}"#
        );

        let done = SummaryEvent::Done { summary: "".into() };
        assert_eq!(
            serde_json::to_string(&done).unwrap(),
            r#"{"type":"done","summary":""}"#
        );
    }

    #[test]
    fn translation_events_carry_the_translation_field() {
        let event = TranslationEvent::Progress {
            translation: "अनुवाद".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""translation":"#));
        assert!(!json.contains(r#""summary""#));
    }
}
