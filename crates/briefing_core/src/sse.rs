//! crates/briefing_core/src/sse.rs
//!
//! The Server-Sent-Events wire model and an incremental, byte-buffered
//! parser for it. The parser must reconstruct discrete events from a raw
//! byte stream no matter where the network happens to split chunks: inside
//! the `data:` marker, inside the JSON payload, or inside a multi-byte
//! UTF-8 sequence.

/// One reconstructed event from the relay's stream.
///
/// Zero or more `Progress` events precede exactly one terminal event; a
/// truncated transport with no terminal event is treated by the consumer as
/// an implicit `Done` carrying no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A complete, possibly revised, snapshot of the generation so far.
    Progress { snapshot: String },
    /// The terminal success event. The payload is absent when the server
    /// had nothing to report.
    Done { final_text: Option<String> },
    /// The terminal failure event, carrying a human-readable message.
    Error { message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SseParseError {
    #[error("Failed to parse streaming payload")]
    Payload,
    #[error("Event block was not valid UTF-8")]
    Encoding,
}

/// Incremental SSE parser. Feed it raw chunks as they arrive; it retains
/// an internal buffer across pushes and only emits complete events.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and drains every complete event now available.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<StreamEvent>, SseParseError> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(boundary) = find_blank_line(&self.buffer) {
            let block: Vec<u8> = self.buffer.drain(..boundary + 2).collect();
            let raw = std::str::from_utf8(&block[..boundary])
                .map_err(|_| SseParseError::Encoding)?
                .trim();
            if raw.is_empty() {
                continue;
            }
            events.extend(parse_event_block(raw)?);
        }
        Ok(events)
    }

    /// Flushes any trailing event the transport closed without delimiting.
    pub fn finish(&mut self) -> Result<Vec<StreamEvent>, SseParseError> {
        let block = std::mem::take(&mut self.buffer);
        let raw = std::str::from_utf8(&block)
            .map_err(|_| SseParseError::Encoding)?
            .trim();
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        parse_event_block(raw)
    }
}

fn find_blank_line(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

/// Parses one event block. Only lines carrying the `data:` marker are
/// payload; everything else (comments, `event:` fields, id lines) is
/// deliberately ignored.
fn parse_event_block(raw: &str) -> Result<Vec<StreamEvent>, SseParseError> {
    let mut events = Vec::new();
    for line in raw.lines() {
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();
        if data.is_empty() {
            continue;
        }
        let payload: serde_json::Value =
            serde_json::from_str(data).map_err(|_| SseParseError::Payload)?;
        if let Some(event) = classify_payload(&payload) {
            events.push(event);
        }
    }
    Ok(events)
}

/// Maps one JSON payload to an event. Progress payloads carry the snapshot
/// in either the `summary` or the `translation` field; payloads with no
/// usable string field are dropped without erroring.
fn classify_payload(payload: &serde_json::Value) -> Option<StreamEvent> {
    let snapshot_field = payload
        .get("summary")
        .or_else(|| payload.get("translation"))
        .and_then(|v| v.as_str());

    match payload.get("type").and_then(|t| t.as_str()) {
        Some("progress") => snapshot_field.map(|s| StreamEvent::Progress {
            snapshot: s.to_string(),
        }),
        Some("done") => Some(StreamEvent::Done {
            final_text: snapshot_field.map(str::to_string),
        }),
        Some("error") => {
            let message = payload
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("An error occurred during streaming.")
                .to_string();
            Some(StreamEvent::Error { message })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events_of(raw: &[u8]) -> Vec<StreamEvent> {
        let mut parser = SseParser::new();
        let mut events = parser.push(raw).unwrap();
        events.extend(parser.finish().unwrap());
        events
    }

    const SAMPLE: &[u8] = b"data: {\"type\":\"progress\",\"summary\":\"Key \"}\n\n\
data: {\"type\":\"progress\",\"summary\":\"Key Terms\"}\n\n\
data: {\"type\":\"done\",\"summary\":\"Key Terms: all of them\"}\n\n";

    fn expected_sample() -> Vec<StreamEvent> {
        vec![
            StreamEvent::Progress {
                snapshot: "Key ".into(),
            },
            StreamEvent::Progress {
                snapshot: "Key Terms".into(),
            },
            StreamEvent::Done {
                final_text: Some("Key Terms: all of them".into()),
            },
        ]
    }

    #[test]
    fn parses_a_whole_stream_in_one_push() {
        assert_eq!(events_of(SAMPLE), expected_sample());
    }

    #[test]
    fn reconstructs_events_across_every_split_offset() {
        for split in 0..=SAMPLE.len() {
            let mut parser = SseParser::new();
            let mut events = parser.push(&SAMPLE[..split]).unwrap();
            events.extend(parser.push(&SAMPLE[split..]).unwrap());
            events.extend(parser.finish().unwrap());
            assert_eq!(events, expected_sample(), "split at byte {}", split);
        }
    }

    #[test]
    fn survives_splits_inside_multibyte_utf8() {
        let raw = "data: {\"type\":\"progress\",\"translation\":\"सारांश\"}\n\n".as_bytes();
        for split in 0..=raw.len() {
            let mut parser = SseParser::new();
            let mut events = parser.push(&raw[..split]).unwrap();
            events.extend(parser.push(&raw[split..]).unwrap());
            assert_eq!(
                events,
                vec![StreamEvent::Progress {
                    snapshot: "सारांश".into()
                }],
                "split at byte {}",
                split
            );
        }
    }

    #[test]
    fn replaying_the_same_bytes_yields_the_same_events() {
        assert_eq!(events_of(SAMPLE), events_of(SAMPLE));
    }

    #[test]
    fn non_data_lines_are_ignored() {
        let raw = b": keep-alive comment\nevent: message\ndata: {\"type\":\"done\",\"summary\":\"s\"}\n\n";
        assert_eq!(
            events_of(raw),
            vec![StreamEvent::Done {
                final_text: Some("s".into())
            }]
        );
    }

    #[test]
    fn progress_without_usable_field_is_dropped() {
        let raw = b"data: {\"type\":\"progress\"}\n\ndata: {\"type\":\"progress\",\"summary\":42}\n\n";
        assert!(events_of(raw).is_empty());
    }

    #[test]
    fn translation_field_carries_the_snapshot() {
        let raw = b"data: {\"type\":\"progress\",\"translation\":\"anuvaad\"}\n\n";
        assert_eq!(
            events_of(raw),
            vec![StreamEvent::Progress {
                snapshot: "anuvaad".into()
            }]
        );
    }

    #[test]
    fn error_event_carries_the_message() {
        let raw = b"data: {\"type\":\"error\",\"message\":\"model overloaded\"}\n\n";
        assert_eq!(
            events_of(raw),
            vec![StreamEvent::Error {
                message: "model overloaded".into()
            }]
        );
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"data: {not json}\n\n").is_err());
    }

    #[test]
    fn done_without_payload_has_no_final_text() {
        let raw = b"data: {\"type\":\"done\"}\n\n";
        assert_eq!(events_of(raw), vec![StreamEvent::Done { final_text: None }]);
    }
}
