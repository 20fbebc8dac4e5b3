//! Incremental decoder for the Messages API's server-sent event stream.
//!
//! Chunks arrive on arbitrary byte boundaries, so raw bytes are buffered
//! until a full line is available; splitting before UTF-8 decoding keeps
//! multi-byte sequences that straddle chunks intact. Only `data:` lines
//! carry payloads. `event:` lines and blank separators are redundant with
//! the `type` field inside each payload and are skipped.

use serde::Deserialize;

use super::{GenerationError, StreamEvent, Usage};

#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    input_tokens: u32,
    output_tokens: u32,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one network chunk in and drains every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<StreamEvent>, GenerationError> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.is_empty() {
                continue;
            }
            let line = std::str::from_utf8(&line).map_err(|_| {
                GenerationError::Protocol("event stream is not valid UTF-8".to_string())
            })?;
            if let Some(event) = self.decode_line(line)? {
                events.push(event);
            }
        }
        Ok(events)
    }

    fn decode_line(&mut self, line: &str) -> Result<Option<StreamEvent>, GenerationError> {
        let Some(payload) = line.strip_prefix("data:") else {
            return Ok(None);
        };

        let raw: RawEvent = serde_json::from_str(payload.trim_start())?;
        Ok(match raw {
            RawEvent::MessageStart { message } => {
                self.input_tokens = message.usage.input_tokens;
                self.output_tokens = message.usage.output_tokens;
                None
            }
            RawEvent::ContentBlockDelta { delta } => match delta {
                RawDelta::TextDelta { text } => Some(StreamEvent::TextDelta(text)),
                RawDelta::Other => None,
            },
            RawEvent::MessageDelta { usage } => {
                // Cumulative output count; the final one wins.
                self.output_tokens = usage.output_tokens;
                None
            }
            RawEvent::MessageStop => Some(StreamEvent::Completed(Usage {
                input_tokens: self.input_tokens,
                output_tokens: self.output_tokens,
            })),
            RawEvent::Error { error } => {
                return Err(GenerationError::Api {
                    status: None,
                    message: format!("{}: {}", error.kind, error.message),
                });
            }
            RawEvent::Other => None,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawEvent {
    MessageStart { message: RawMessage },
    ContentBlockDelta { delta: RawDelta },
    MessageDelta { usage: RawDeltaUsage },
    MessageStop,
    Error { error: RawApiError },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    usage: RawUsage,
}

#[derive(Debug, Deserialize)]
struct RawUsage {
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawDelta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RawDeltaUsage {
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct RawApiError {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = concat!(
        "event: message_start\n",
        "data: {\"type\":\"message_start\",\"message\":{\"id\":\"msg_01\",\"usage\":{\"input_tokens\":25,\"output_tokens\":1}}}\n",
        "\n",
        "event: content_block_start\n",
        "data: {\"type\":\"content_block_start\",\"index\":0,\"content_block\":{\"type\":\"text\",\"text\":\"\"}}\n",
        "\n",
        "event: ping\n",
        "data: {\"type\":\"ping\"}\n",
        "\n",
        "event: content_block_delta\n",
        "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hello\"}}\n",
        "\n",
        "event: content_block_delta\n",
        "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\" world\"}}\n",
        "\n",
        "event: content_block_stop\n",
        "data: {\"type\":\"content_block_stop\",\"index\":0}\n",
        "\n",
        "event: message_delta\n",
        "data: {\"type\":\"message_delta\",\"delta\":{\"stop_reason\":\"end_turn\"},\"usage\":{\"output_tokens\":15}}\n",
        "\n",
        "event: message_stop\n",
        "data: {\"type\":\"message_stop\"}\n",
        "\n",
    );

    #[test]
    fn test_full_transcript_order_and_usage() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(TRANSCRIPT.as_bytes()).unwrap();
        assert_eq!(
            events,
            vec![
                StreamEvent::TextDelta("Hello".to_string()),
                StreamEvent::TextDelta(" world".to_string()),
                StreamEvent::Completed(Usage {
                    input_tokens: 25,
                    output_tokens: 15,
                }),
            ]
        );
    }

    #[test]
    fn test_chunks_split_mid_line() {
        let mut decoder = SseDecoder::new();
        let line = "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"split\"}}\n";
        let (a, b) = line.as_bytes().split_at(40);

        assert!(decoder.push(a).unwrap().is_empty());
        let events = decoder.push(b).unwrap();
        assert_eq!(events, vec![StreamEvent::TextDelta("split".to_string())]);
    }

    #[test]
    fn test_chunks_split_inside_multibyte_char() {
        let mut decoder = SseDecoder::new();
        let line = "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"résumé\"}}\n";
        let bytes = line.as_bytes();
        // Split inside the two-byte "é".
        let split = line.find('é').unwrap() + 1;

        assert!(decoder.push(&bytes[..split]).unwrap().is_empty());
        let events = decoder.push(&bytes[split..]).unwrap();
        assert_eq!(events, vec![StreamEvent::TextDelta("résumé".to_string())]);
    }

    #[test]
    fn test_crlf_lines() {
        let mut decoder = SseDecoder::new();
        let events = decoder
            .push(b"data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"x\"}}\r\n")
            .unwrap();
        assert_eq!(events, vec![StreamEvent::TextDelta("x".to_string())]);
    }

    #[test]
    fn test_unknown_event_kinds_skipped() {
        let mut decoder = SseDecoder::new();
        let events = decoder
            .push(b"data: {\"type\":\"content_block_start\",\"index\":0}\ndata: {\"type\":\"ping\"}\n")
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_non_text_delta_skipped() {
        let mut decoder = SseDecoder::new();
        let events = decoder
            .push(b"data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"input_json_delta\",\"partial_json\":\"{}\"}}\n")
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_error_event_surfaces_api_error() {
        let mut decoder = SseDecoder::new();
        let result = decoder.push(
            b"data: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}\n",
        );
        match result {
            Err(GenerationError::Api { status, message }) => {
                assert!(status.is_none());
                assert!(message.contains("Overloaded"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_payload_is_a_parse_error() {
        let mut decoder = SseDecoder::new();
        let result = decoder.push(b"data: {not json}\n");
        assert!(matches!(result, Err(GenerationError::Parse(_))));
    }

    #[test]
    fn test_incomplete_line_is_buffered() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"type\":\"ping\"}").unwrap().is_empty());
        assert!(decoder.push(b"\n").unwrap().is_empty());
    }
}
