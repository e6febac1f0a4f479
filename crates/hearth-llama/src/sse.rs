//! Server-sent-event parsing for the `/completion` stream.

use hearth_core::BackendError;
use serde::Deserialize;

/// One decoded chunk of a streamed completion.
#[derive(Debug, Deserialize, PartialEq)]
pub(crate) struct CompletionChunk {
    /// Text produced since the previous chunk.
    #[serde(default)]
    pub content: String,
    /// Whether generation finished (stop sequence or token budget).
    #[serde(default)]
    pub stop: bool,
}

/// Extract the payload of a single SSE line, if it carries one.
///
/// `llama-server` emits `data: {json}` lines separated by blank lines;
/// anything else (comments, empty keep-alives) is skipped.
pub(crate) fn event_payload(line: &str) -> Option<&str> {
    let line = line.trim_end_matches('\r');
    let payload = line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:"))?;
    let payload = payload.trim();
    if payload.is_empty() {
        return None;
    }
    Some(payload)
}

/// Decode one event payload into a completion chunk.
pub(crate) fn parse_chunk(payload: &str) -> Result<CompletionChunk, BackendError> {
    serde_json::from_str(payload).map_err(|err| BackendError::Parse(err.to_string()))
}

/// Split complete lines off the front of the byte receive buffer.
///
/// Network chunk boundaries are arbitrary and can land inside a multi-byte
/// character, so bytes are only decoded once a full line has arrived; the
/// `\n` terminator is ASCII and never splits a character.
pub(crate) fn drain_lines(buffer: &mut Vec<u8>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=pos).collect();
        let line = String::from_utf8_lossy(&line);
        lines.push(line.trim_end_matches(['\n', '\r']).to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{CompletionChunk, drain_lines, event_payload, parse_chunk};
    use pretty_assertions::assert_eq;

    #[test]
    fn payload_is_stripped_from_data_lines() {
        assert_eq!(
            event_payload(r#"data: {"content":"hi","stop":false}"#),
            Some(r#"{"content":"hi","stop":false}"#)
        );
        assert_eq!(event_payload(""), None);
        assert_eq!(event_payload(": keep-alive"), None);
        assert_eq!(event_payload("data:"), None);
    }

    #[test]
    fn chunk_decodes_content_and_stop_flag() {
        let chunk = parse_chunk(r#"{"content":" world","stop":false}"#).expect("chunk");
        assert_eq!(
            chunk,
            CompletionChunk {
                content: " world".to_string(),
                stop: false,
            }
        );
        let last = parse_chunk(r#"{"content":"","stop":true,"tokens_predicted":42}"#)
            .expect("final chunk");
        assert!(last.stop);
    }

    #[test]
    fn malformed_chunk_is_a_parse_error() {
        assert!(parse_chunk("{not json").is_err());
    }

    #[test]
    fn drain_lines_keeps_partial_tail() {
        let mut buffer = b"data: a\r\ndata: b\ndata: partial".to_vec();
        let lines = drain_lines(&mut buffer);
        assert_eq!(lines, vec!["data: a".to_string(), "data: b".to_string()]);
        assert_eq!(buffer, b"data: partial");
    }

    #[test]
    fn multibyte_character_split_across_chunks_survives() {
        let event = "data: {\"content\":\"héllo\",\"stop\":false}\n".as_bytes();
        // Split inside the two-byte 'é'.
        let split = event.iter().position(|&b| b >= 0x80).unwrap() + 1;
        let (head, tail) = event.split_at(split);

        let mut buffer = head.to_vec();
        assert!(drain_lines(&mut buffer).is_empty());

        buffer.extend_from_slice(tail);
        let lines = drain_lines(&mut buffer);
        assert_eq!(lines.len(), 1);
        let payload = event_payload(&lines[0]).expect("payload");
        let chunk = parse_chunk(payload).expect("chunk");
        assert_eq!(chunk.content, "héllo");
    }
}
