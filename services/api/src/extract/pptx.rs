//! services/api/src/extract/pptx.rs
//!
//! Structural text extraction for presentations: parse the archive's
//! per-slide XML parts in ascending slide-number order and concatenate
//! their `a:t` text nodes, separating slides by a blank line.

use briefing_core::ports::{PortError, PortResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub fn extract(bytes: &[u8]) -> PortResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| PortError::Unexpected(format!("Failed to open slides archive: {e}")))?;

    let mut slide_parts: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    // "slide10.xml" must come after "slide2.xml", so sort numerically.
    slide_parts.sort_by_key(|name| slide_number(name));

    let mut slides = Vec::new();
    for part in slide_parts {
        let mut xml = String::new();
        archive
            .by_name(&part)
            .map_err(|e| PortError::Unexpected(format!("Failed to open slide part: {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| PortError::Unexpected(format!("Failed to read slide part: {e}")))?;
        let text = slide_text(&xml)?;
        if !text.is_empty() {
            slides.push(text);
        }
    }

    Ok(slides.join("\n\n"))
}

fn slide_number(part_name: &str) -> u32 {
    part_name
        .trim_start_matches("ppt/slides/slide")
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(u32::MAX)
}

/// Collects the `a:t` text nodes of one slide, whitespace-collapsed.
fn slide_text(xml: &str) -> PortResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut inside_text = false;
    let mut pieces: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"a:t" => inside_text = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"a:t" => inside_text = false,
            Ok(Event::Text(t)) if inside_text => {
                let text = t
                    .unescape()
                    .map_err(|e| PortError::Unexpected(format!("Malformed slide XML: {e}")))?;
                let trimmed = text.trim().to_string();
                if !trimmed.is_empty() {
                    pieces.push(trimmed);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(PortError::Unexpected(format!("Malformed slide XML: {e}"))),
        }
    }

    Ok(pieces.join(" "))
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

    fn slide(texts: &[&str]) -> String {
        let nodes: String = texts
            .iter()
            .map(|t| format!("<a:r><a:t>{t}</a:t></a:r>"))
            .collect();
        format!(r#"<p:sld xmlns:a="ns" xmlns:p="ns2"><p:txBody>{nodes}</p:txBody></p:sld>"#)
    }

    #[test]
    fn slides_join_with_a_blank_line_in_numeric_order() {
        // Deliberately out of lexicographic order: slide10 must come last.
        let bytes = zip_with(&[
            ("ppt/slides/slide10.xml", &slide(&["Closing"])),
            ("ppt/slides/slide1.xml", &slide(&["Opening", "remarks"])),
            ("ppt/slides/slide2.xml", &slide(&["Obligations"])),
        ]);
        let text = extract(&bytes).unwrap();
        assert_eq!(text, "Opening remarks\n\nObligations\n\nClosing");
    }

    #[test]
    fn empty_slides_are_skipped() {
        let bytes = zip_with(&[
            ("ppt/slides/slide1.xml", &slide(&["Only slide with text"])),
            ("ppt/slides/slide2.xml", &slide(&[])),
        ]);
        assert_eq!(extract(&bytes).unwrap(), "Only slide with text");
    }

    #[test]
    fn deck_without_slides_yields_empty_text() {
        let bytes = zip_with(&[("ppt/presentation.xml", "<p:presentation/>")]);
        assert_eq!(extract(&bytes).unwrap(), "");
    }

    #[test]
    fn garbage_bytes_fail_without_panicking() {
        assert!(extract(b"\x00\x01\x02").is_err());
    }
}
