//! crates/briefing_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format
//! except where a value travels on the wire verbatim (languages).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document the user uploaded, after text extraction succeeded.
/// Held in memory for the session; never persisted as-is.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub text: String,
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single entry in the append-only Q&A transcript for a session.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
}

/// A persisted briefing-history row, owned by the storage collaborator.
#[derive(Debug, Clone)]
pub struct BriefingRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The outcome of language detection on a user's question.
/// `Unknown` blocks further processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
    Telugu,
    Unknown,
}

impl Language {
    /// Parses a model's free-text classification. Anything that is not an
    /// exact supported language name resolves to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "English" => Language::English,
            "Hindi" => Language::Hindi,
            "Telugu" => Language::Telugu,
            _ => Language::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Telugu => "Telugu",
            Language::Unknown => "Unknown",
        }
    }
}

/// The languages a summary can be translated into. This is the request-level
/// value; unsupported strings fail deserialization at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationLanguage {
    Hindi,
    Telugu,
}

impl TranslationLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationLanguage::Hindi => "Hindi",
            TranslationLanguage::Telugu => "Telugu",
        }
    }

    /// Parses the request-level language value. Matching is exact and
    /// lowercase; anything else is unsupported.
    pub fn from_request_value(value: &str) -> Option<Self> {
        match value {
            "hindi" => Some(TranslationLanguage::Hindi),
            "telugu" => Some(TranslationLanguage::Telugu),
            _ => None,
        }
    }
}

/// The closed set of media types the file decoder knows how to handle.
/// Dispatch happens on this enum, never on raw MIME strings, so the
/// unsupported arm is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Word,
    Slides,
    Pdf,
    Jpeg,
    Png,
}

const WORD_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const SLIDES_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

impl MediaKind {
    /// Maps a declared MIME type onto the closed dispatch set.
    /// Returns `None` for anything the decoder does not support.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            WORD_MIME => Some(MediaKind::Word),
            SLIDES_MIME => Some(MediaKind::Slides),
            "application/pdf" => Some(MediaKind::Pdf),
            "image/jpeg" => Some(MediaKind::Jpeg),
            "image/png" => Some(MediaKind::Png),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_maps_supported_mimes() {
        assert_eq!(MediaKind::from_mime("application/pdf"), Some(MediaKind::Pdf));
        assert_eq!(MediaKind::from_mime("image/jpeg"), Some(MediaKind::Jpeg));
        assert_eq!(MediaKind::from_mime("image/png"), Some(MediaKind::Png));
        assert_eq!(MediaKind::from_mime(WORD_MIME), Some(MediaKind::Word));
        assert_eq!(MediaKind::from_mime(SLIDES_MIME), Some(MediaKind::Slides));
    }

    #[test]
    fn media_kind_rejects_everything_else() {
        assert_eq!(MediaKind::from_mime("text/html"), None);
        assert_eq!(MediaKind::from_mime("application/zip"), None);
        assert_eq!(MediaKind::from_mime(""), None);
    }

    #[test]
    fn language_from_label_is_strict() {
        assert_eq!(Language::from_label("Hindi"), Language::Hindi);
        assert_eq!(Language::from_label("  Telugu "), Language::Telugu);
        assert_eq!(Language::from_label("french"), Language::Unknown);
        assert_eq!(Language::from_label("english"), Language::Unknown);
    }

    #[test]
    fn translation_language_wire_values_are_lowercase() {
        let lang: TranslationLanguage = serde_json::from_str("\"hindi\"").unwrap();
        assert_eq!(lang, TranslationLanguage::Hindi);
        assert!(serde_json::from_str::<TranslationLanguage>("\"english\"").is_err());
    }

    #[test]
    fn translation_language_request_parsing_is_exact() {
        assert_eq!(
            TranslationLanguage::from_request_value("hindi"),
            Some(TranslationLanguage::Hindi)
        );
        assert_eq!(
            TranslationLanguage::from_request_value("telugu"),
            Some(TranslationLanguage::Telugu)
        );
        assert_eq!(TranslationLanguage::from_request_value("Hindi"), None);
        assert_eq!(TranslationLanguage::from_request_value("english"), None);
    }
}
