use serde::Deserialize;

use super::{Frame, Usage};

/// A newline-delimited JSON frame, discriminated by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NdjsonFrame {
    Item { content: Option<String> },
    End { usage: Option<Usage> },
}

/// Decode one trimmed line as an NDJSON frame.
///
/// Lines that fail to parse, carry an unrecognized `type`, or have no
/// content are dropped rather than surfaced as literal text — unlike the
/// SSE dialect's non-JSON fallback.
#[must_use]
pub fn decode_line(line: &str) -> Frame {
    match serde_json::from_str::<NdjsonFrame>(line) {
        Ok(NdjsonFrame::Item {
            content: Some(content),
        }) if !content.is_empty() => Frame::Delta(content),
        Ok(NdjsonFrame::Item { .. }) => Frame::Ignored,
        Ok(NdjsonFrame::End { usage }) => Frame::Terminal(usage),
        Err(_) => Frame::Ignored,
    }
}
