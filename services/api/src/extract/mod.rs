//! services/api/src/extract/mod.rs
//!
//! The file decoder: sniffs the media type from a data URI and dispatches to
//! a format-specific extractor, with an optional AI-vision fallback for
//! files the structural extractors cannot handle.

pub mod data_uri;
pub mod docx;
pub mod ocr;
pub mod pdf;
pub mod pptx;

pub use data_uri::DataUri;
pub use ocr::{OcrConfig, OcrEngine};

use briefing_core::domain::MediaKind;
use briefing_core::ports::{PortError, PortResult, VisionExtractionService};
use std::sync::Arc;
use tracing::warn;

/// Decodes an uploaded file into plain text.
///
/// Dispatch is a closed match on [`MediaKind`]; unsupported MIME types fail
/// with `UnsupportedType` before any bytes are inspected. A structural
/// extraction that fails or comes back empty goes through the vision
/// fallback when one is configured, otherwise it is `ExtractionEmpty`.
/// A success never carries an empty string.
pub struct FileDecoder {
    ocr: Arc<OcrEngine>,
    vision: Option<Arc<dyn VisionExtractionService>>,
}

impl FileDecoder {
    pub fn new(ocr: Arc<OcrEngine>, vision: Option<Arc<dyn VisionExtractionService>>) -> Self {
        Self { ocr, vision }
    }

    pub async fn extract_text(&self, raw_uri: &str) -> PortResult<String> {
        let uri = DataUri::parse(raw_uri)?;
        let kind = MediaKind::from_mime(&uri.mime_type)
            .ok_or_else(|| PortError::UnsupportedType(uri.mime_type.clone()))?;

        let structural = match kind {
            MediaKind::Word => docx::extract(&uri.bytes),
            MediaKind::Slides => pptx::extract(&uri.bytes),
            MediaKind::Pdf => pdf::extract(&uri.bytes),
            MediaKind::Jpeg => self.ocr.recognize(&uri.bytes, "jpg").await,
            MediaKind::Png => self.ocr.recognize(&uri.bytes, "png").await,
        };

        match structural {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => self.fallback(&uri, raw_uri).await,
            Err(e) => {
                warn!("Structural extraction failed for {}: {}", uri.mime_type, e);
                self.fallback(&uri, raw_uri).await
            }
        }
    }

    /// Best-effort transcription through the vision model, or the typed
    /// empty-extraction failure when no fallback is configured.
    async fn fallback(&self, uri: &DataUri, raw_uri: &str) -> PortResult<String> {
        let Some(vision) = &self.vision else {
            return Err(PortError::ExtractionEmpty);
        };
        let text = vision.transcribe(&uri.mime_type, raw_uri).await?;
        if text.trim().is_empty() {
            return Err(PortError::ExtractionEmpty);
        }
        Ok(text)
    }
}
