/// Failure reported through [`EventSink::on_error`](crate::sink::EventSink::on_error).
///
/// Only transport-level problems are errors. Malformed frames, missing
/// fields, and a stream that closes without a terminal sentinel are all
/// handled locally by the decoder and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid utf-8 in stream chunk (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
    #[error("transport error: {0}")]
    Transport(String),
}
