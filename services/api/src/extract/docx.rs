//! services/api/src/extract/docx.rs
//!
//! Structural text extraction for Word documents: unpack the OOXML archive
//! and concatenate the `w:t` text runs from the main document part.

use briefing_core::ports::{PortError, PortResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub fn extract(bytes: &[u8]) -> PortResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| PortError::Unexpected(format!("Failed to open Word archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| PortError::Unexpected(format!("Word archive has no document part: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| PortError::Unexpected(format!("Failed to read Word document part: {e}")))?;

    text_runs(&xml)
}

/// Walks the document XML, appending `w:t` runs and breaking lines at
/// paragraph (`w:p`) boundaries.
fn text_runs(xml: &str) -> PortResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut inside_run = false;
    let mut output = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => inside_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => inside_run = false,
                b"w:p" => {
                    if !output.is_empty() && !output.ends_with('\n') {
                        output.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) if inside_run => {
                let text = t
                    .unescape()
                    .map_err(|e| PortError::Unexpected(format!("Malformed document XML: {e}")))?;
                output.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(PortError::Unexpected(format!("Malformed document XML: {e}")))
            }
        }
    }

    Ok(output.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zip_with(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    const DOC_XML: &str = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Non-Disclosure </w:t></w:r><w:r><w:t>Agreement</w:t></w:r></w:p>
    <w:p><w:r><w:t>Term: two years.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn concatenates_runs_and_breaks_paragraphs() {
        let bytes = zip_with(&[("word/document.xml", DOC_XML)]);
        let text = extract(&bytes).unwrap();
        assert_eq!(text, "Non-Disclosure Agreement\nTerm: two years.");
    }

    #[test]
    fn archive_without_document_part_fails() {
        let bytes = zip_with(&[("word/styles.xml", "<w:styles/>")]);
        assert!(extract(&bytes).is_err());
    }

    #[test]
    fn garbage_bytes_fail_without_panicking() {
        assert!(extract(b"not a zip archive at all").is_err());
    }

    #[test]
    fn entities_are_unescaped() {
        let xml = r#"<w:document xmlns:w="ns"><w:body><w:p><w:r><w:t>Smith &amp; Co</w:t></w:r></w:p></w:body></w:document>"#;
        let bytes = zip_with(&[("word/document.xml", xml)]);
        assert_eq!(extract(&bytes).unwrap(), "Smith & Co");
    }
}
