//! services/api/src/extract/data_uri.rs
//!
//! Parsing for the self-describing upload payload: a `data:` URI carrying a
//! declared MIME type and a Base64-encoded body.

use base64::{engine::general_purpose::STANDARD, Engine};
use briefing_core::ports::{PortError, PortResult};
use regex::Regex;
use std::sync::OnceLock;

/// A decoded `data:<mime-type>;base64,<payload>` value.
#[derive(Debug, Clone)]
pub struct DataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

fn data_uri_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^data:(.*?);base64,(.+)$").unwrap())
}

impl DataUri {
    /// Parses and decodes a data URI. Anything without the type tag and the
    /// `;base64,` marker, or with an undecodable body, is `InvalidInput`.
    /// Malformed payloads never reach format dispatch.
    pub fn parse(raw: &str) -> PortResult<Self> {
        let captures = data_uri_pattern()
            .captures(raw)
            .ok_or_else(|| PortError::InvalidInput("Invalid file data URI.".to_string()))?;

        let mime_type = captures[1].to_string();
        let bytes = STANDARD
            .decode(&captures[2])
            .map_err(|e| PortError::InvalidInput(format!("Invalid Base64 payload: {e}")))?;

        Ok(Self { mime_type, bytes })
    }
}
