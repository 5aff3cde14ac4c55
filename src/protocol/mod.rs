pub mod ndjson;
pub mod sse;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Scratch buffer for the frames decoded from a single line.
///
/// A line yields at most two frames (an SSE chunk carrying both content and
/// usage), so the inline capacity avoids heap allocation on the hot path.
pub type FrameBuf = SmallVec<[Frame; 2]>;

/// Token usage reported by the upstream completion API.
///
/// Fields absent on the wire stay `None`; they are never defaulted to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

/// A logical unit extracted from one buffered line.
///
/// Both dialects decode into this sum type before any decoder state is
/// touched.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Incremental content to append to the accumulated text. Never empty.
    Delta(String),
    /// Usage metadata attached to a non-terminal chunk.
    Usage(Usage),
    /// Terminal sentinel, optionally carrying usage.
    Terminal(Option<Usage>),
    /// A line recognized by neither dialect, or carrying nothing to emit.
    Ignored,
}

/// Decode one buffered line into frames.
///
/// Dialect dispatch is per line: a `data: `-prefixed line belongs to the
/// SSE dialect, anything else is attempted as a newline-delimited JSON
/// object. Blank lines and lines neither dialect recognizes produce no
/// frames.
pub fn decode_line_into(line: &str, out: &mut FrameBuf) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    if let Some(payload) = line.strip_prefix(sse::DATA_PREFIX) {
        sse::decode_data_payload_into(payload.trim(), out);
        return;
    }
    match ndjson::decode_line(line) {
        Frame::Ignored => {}
        frame => out.push(frame),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_yields_nothing() {
        let mut out = FrameBuf::new();
        decode_line_into("   ", &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_sse_line_dispatch() {
        let mut out = FrameBuf::new();
        decode_line_into(r#"data: {"choices":[{"delta":{"content":"Hi"}}]}"#, &mut out);
        assert_eq!(out.as_slice(), [Frame::Delta("Hi".to_string())]);
    }

    #[test]
    fn test_ndjson_line_dispatch() {
        let mut out = FrameBuf::new();
        decode_line_into(r#"{"type":"item","content":"Hi"}"#, &mut out);
        assert_eq!(out.as_slice(), [Frame::Delta("Hi".to_string())]);
    }

    #[test]
    fn test_unrecognized_line_yields_nothing() {
        let mut out = FrameBuf::new();
        decode_line_into("event: ping", &mut out);
        decode_line_into(": keep-alive comment", &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_leading_whitespace_before_prefix() {
        let mut out = FrameBuf::new();
        decode_line_into("  data: [DONE]", &mut out);
        assert_eq!(out.as_slice(), [Frame::Terminal(None)]);
    }
}
