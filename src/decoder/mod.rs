pub mod lines;

use tracing::trace;

use crate::error::DecodeError;
use crate::protocol::{self, Frame, FrameBuf, Usage};
use crate::sink::EventSink;
use lines::LineSplitter;

/// Lifecycle of a single decoder instance.
///
/// `Completed` and `Failed` are absorbing: once reached, further
/// `feed`/`end`/`fail` calls are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    Idle,
    Streaming,
    Completed,
    Failed,
}

impl DecoderState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, DecoderState::Completed | DecoderState::Failed)
    }
}

/// Incremental chat-completion stream decoder.
///
/// One instance handles one request/response exchange: feed it the decoded
/// text chunks of the response body in arrival order, then call
/// [`end`](Self::end) once the transport reports the stream exhausted.
/// Content deltas and the single terminal event are delivered synchronously
/// through the injected [`EventSink`]; the growing text is also kept on the
/// decoder and readable through [`text`](Self::text).
///
/// Frames split across chunk boundaries are reassembled, and the SSE and
/// NDJSON dialects are auto-detected per line — no configuration needed.
pub struct StreamDecoder<S> {
    lines: LineSplitter,
    state: DecoderState,
    accumulated: String,
    usage: Option<Usage>,
    sink: S,
}

impl<S: EventSink> StreamDecoder<S> {
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            lines: LineSplitter::new(),
            state: DecoderState::Idle,
            accumulated: String::new(),
            usage: None,
            sink,
        }
    }

    /// Feed the next chunk of decoded text, in strict arrival order.
    ///
    /// May synchronously emit zero or more deltas and at most one terminal
    /// event through the sink. Calling after the decoder reached a terminal
    /// state is a no-op, so late transport callbacks are harmless.
    pub fn feed(&mut self, chunk: &str) {
        if self.state.is_terminal() {
            return;
        }
        self.state = DecoderState::Streaming;
        self.lines.push(chunk);
        self.drain_lines();
    }

    /// Signal that the transport is exhausted and no more chunks will arrive.
    ///
    /// No-op if a terminal frame was already observed during `feed`.
    /// Otherwise the unterminated tail is processed as a final line (it may
    /// itself carry a delta or a terminal frame) and the decoder completes;
    /// without a terminal frame the completion carries no usage.
    pub fn end(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        let tail = self.lines.take_tail();
        let mut frames = FrameBuf::new();
        protocol::decode_line_into(&tail, &mut frames);
        if self.apply(&mut frames) {
            return;
        }
        trace!("stream ended without terminal sentinel");
        self.state = DecoderState::Completed;
        self.sink.on_complete(None);
    }

    /// Report a transport or text-decoding failure.
    ///
    /// The error reaches the sink exactly once and the decoder moves to
    /// [`DecoderState::Failed`]; deltas already emitted stand, and no
    /// completion follows. A stream that already terminated ignores the
    /// call.
    pub fn fail(&mut self, err: DecodeError) {
        if self.state.is_terminal() {
            return;
        }
        self.lines.clear();
        self.state = DecoderState::Failed;
        self.sink.on_error(err);
    }

    #[must_use]
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Snapshot of the accumulated content so far. Grows monotonically.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.accumulated
    }

    /// Last usage observed on the stream, chunk-level or terminal.
    #[must_use]
    pub fn usage(&self) -> Option<&Usage> {
        self.usage.as_ref()
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the decoder, returning the sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn drain_lines(&mut self) {
        let mut frames = FrameBuf::new();
        loop {
            let Some(line) = self.lines.next_line() else {
                return;
            };
            protocol::decode_line_into(line, &mut frames);
            if self.apply(&mut frames) {
                // Lines after the first terminal sentinel are dropped.
                self.lines.clear();
                return;
            }
        }
    }

    /// Apply decoded frames, returning `true` once a terminal frame fires.
    fn apply(&mut self, frames: &mut FrameBuf) -> bool {
        for frame in frames.drain(..) {
            match frame {
                Frame::Delta(text) => {
                    self.accumulated.push_str(&text);
                    self.sink.on_delta(&text);
                }
                Frame::Usage(usage) => {
                    self.usage = Some(usage);
                }
                Frame::Terminal(usage) => {
                    trace!(has_usage = usage.is_some(), "terminal frame observed");
                    if usage.is_some() {
                        self.usage.clone_from(&usage);
                    }
                    self.state = DecoderState::Completed;
                    self.sink.on_complete(usage);
                    return true;
                }
                Frame::Ignored => {}
            }
        }
        false
    }
}
