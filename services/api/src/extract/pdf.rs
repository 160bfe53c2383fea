//! services/api/src/extract/pdf.rs
//!
//! PDF text-layer extraction. Scanned PDFs with no text layer come back
//! empty here; the dispatcher decides what to do with that.

use briefing_core::ports::{PortError, PortResult};

pub fn extract(bytes: &[u8]) -> PortResult<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PortError::Unexpected(format!("Failed to read PDF text layer: {e}")))?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_pdf_fails_without_panicking() {
        // The first bytes of a real PDF header, cut off mid-file.
        let corrupt = b"%PDF-1.4\n1 0 obj\n<<";
        assert!(extract(corrupt).is_err());
    }

    #[test]
    fn arbitrary_bytes_fail_without_panicking() {
        assert!(extract(b"definitely not a pdf").is_err());
    }
}
