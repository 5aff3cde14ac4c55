use std::time::Instant;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::warn;

use crate::decoder::{DecoderState, StreamDecoder};
use crate::error::DecodeError;
use crate::observability;
use crate::sink::EventSink;

/// Pump an HTTP response body stream through a decoder.
///
/// Bytes arriving from the transport are decoded as UTF-8 with partial
/// codepoints carried across chunk boundaries, then fed to the decoder. A
/// transport error or genuinely invalid bytes fail the decoder; a clean end
/// of stream without a terminal sentinel takes the fallback completion
/// path. Returns the decoder's final state as soon as it becomes terminal —
/// the remainder of the body, if any, is left unread.
pub async fn drive<St, E, S>(byte_stream: St, decoder: &mut StreamDecoder<S>) -> DecoderState
where
    St: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
    S: EventSink,
{
    let started = Instant::now();
    let mut remainder: Vec<u8> = Vec::new();
    futures_util::pin_mut!(byte_stream);

    while let Some(item) = byte_stream.next().await {
        match item {
            Ok(bytes) => feed_utf8(decoder, &mut remainder, &bytes),
            Err(err) => {
                warn!(error = %err, "transport error while streaming");
                decoder.fail(DecodeError::Transport(err.to_string()));
            }
        }
        if decoder.state().is_terminal() {
            break;
        }
    }

    if !decoder.state().is_terminal() {
        if remainder.is_empty() {
            decoder.end();
        } else {
            // The stream ended in the middle of a multibyte character.
            decoder.fail(DecodeError::InvalidUtf8 { valid_up_to: 0 });
        }
    }

    if decoder.state() == DecoderState::Completed {
        observability::log_stream_complete(decoder.usage(), started.elapsed());
    }
    decoder.state()
}

/// Decode one chunk of bytes and feed the decoder.
///
/// `remainder` carries the partial codepoint left by the previous chunk. An
/// incomplete sequence at the end of the chunk is carried forward; invalid
/// bytes anywhere fail the decoder before any of the chunk's content is
/// fed, so no partial delta from a failing chunk escapes.
fn feed_utf8<S: EventSink>(
    decoder: &mut StreamDecoder<S>,
    remainder: &mut Vec<u8>,
    bytes: &[u8],
) {
    if remainder.is_empty() {
        match std::str::from_utf8(bytes) {
            Ok(text) => decoder.feed(text),
            Err(e) => match e.error_len() {
                None => {
                    let valid_up_to = e.valid_up_to();
                    // Safety: valid_up_to is guaranteed to be a valid UTF-8 boundary.
                    let text = unsafe { std::str::from_utf8_unchecked(&bytes[..valid_up_to]) };
                    remainder.extend_from_slice(&bytes[valid_up_to..]);
                    decoder.feed(text);
                }
                Some(_) => decoder.fail(DecodeError::InvalidUtf8 {
                    valid_up_to: e.valid_up_to(),
                }),
            },
        }
        return;
    }

    remainder.extend_from_slice(bytes);
    match std::str::from_utf8(remainder) {
        Ok(text) => {
            decoder.feed(text);
            remainder.clear();
        }
        Err(e) => match e.error_len() {
            None => {
                let valid_up_to = e.valid_up_to();
                // Safety: valid_up_to is guaranteed to be a valid UTF-8 boundary.
                let text = unsafe { std::str::from_utf8_unchecked(&remainder[..valid_up_to]) };
                decoder.feed(text);
                if valid_up_to > 0 {
                    let remain_len = remainder.len() - valid_up_to;
                    remainder.copy_within(valid_up_to.., 0);
                    remainder.truncate(remain_len);
                }
            }
            Some(_) => {
                decoder.fail(DecodeError::InvalidUtf8 {
                    valid_up_to: e.valid_up_to(),
                });
                remainder.clear();
            }
        },
    }
}
