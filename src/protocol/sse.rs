use serde::Deserialize;

use super::{Frame, FrameBuf, Usage};

/// Prefix that marks a line as belonging to the SSE dialect.
pub const DATA_PREFIX: &str = "data: ";

const DONE_SENTINEL: &str = "[DONE]";

/// A streamed chat-completion chunk, as carried in an SSE `data:` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<Usage>,
}

/// A single choice within a stream chunk.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub delta: ChatDelta,
}

/// Delta content within a stream choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatDelta {
    pub content: Option<String>,
}

/// Check whether a trimmed SSE payload is the terminal `[DONE]` sentinel.
#[must_use]
pub fn is_done_payload(payload: &str) -> bool {
    payload == DONE_SENTINEL
}

/// Decode a trimmed SSE `data:` payload into frames.
///
/// `[DONE]` is terminal and carries no usage. Valid JSON yields the first
/// choice's delta content (when non-empty) plus any chunk-level usage;
/// valid JSON with an unexpected shape yields nothing. A payload that is
/// not JSON at all is surfaced verbatim as literal content.
pub fn decode_data_payload_into(payload: &str, out: &mut FrameBuf) {
    if payload.is_empty() {
        return;
    }
    if is_done_payload(payload) {
        out.push(Frame::Terminal(None));
        return;
    }
    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(value) => {
            let Ok(chunk) = ChatChunk::deserialize(value) else {
                return;
            };
            let content = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content);
            if let Some(content) = content {
                if !content.is_empty() {
                    out.push(Frame::Delta(content));
                }
            }
            if let Some(usage) = chunk.usage {
                out.push(Frame::Usage(usage));
            }
        }
        Err(_) => out.push(Frame::Delta(payload.to_string())),
    }
}
