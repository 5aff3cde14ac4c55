use crate::error::DecodeError;
use crate::protocol::Usage;

/// Receives decoder output for one request/response exchange.
///
/// A sink is injected when the decoder is constructed; the decoder calls it
/// synchronously from [`feed`](crate::decoder::StreamDecoder::feed),
/// [`end`](crate::decoder::StreamDecoder::end), and
/// [`fail`](crate::decoder::StreamDecoder::fail). Across the lifetime of a
/// decoder instance, exactly one of `on_complete`/`on_error` fires, and the
/// concatenation of all `on_delta` arguments equals the final accumulated
/// text.
pub trait EventSink {
    /// A new content fragment, in arrival order. Never empty.
    fn on_delta(&mut self, text: &str);

    /// The stream terminated normally. `usage` is present only when the
    /// terminal frame explicitly carried one.
    fn on_complete(&mut self, usage: Option<Usage>);

    /// The transport or text decoding failed. Deltas already delivered
    /// stand; no completion follows.
    fn on_error(&mut self, err: DecodeError);
}

/// Sink adapter over three closures, for callers that do not want to name a
/// sink type.
pub struct FnSink<D, C, E> {
    on_delta: D,
    on_complete: C,
    on_error: E,
}

impl<D, C, E> FnSink<D, C, E>
where
    D: FnMut(&str),
    C: FnMut(Option<Usage>),
    E: FnMut(DecodeError),
{
    #[must_use]
    pub fn new(on_delta: D, on_complete: C, on_error: E) -> Self {
        Self {
            on_delta,
            on_complete,
            on_error,
        }
    }
}

impl<D, C, E> EventSink for FnSink<D, C, E>
where
    D: FnMut(&str),
    C: FnMut(Option<Usage>),
    E: FnMut(DecodeError),
{
    fn on_delta(&mut self, text: &str) {
        (self.on_delta)(text);
    }

    fn on_complete(&mut self, usage: Option<Usage>) {
        (self.on_complete)(usage);
    }

    fn on_error(&mut self, err: DecodeError) {
        (self.on_error)(err);
    }
}
