pub mod decoder;
pub mod error;
pub mod observability;
pub mod protocol;
pub mod sink;
pub mod stream;

pub use decoder::{DecoderState, StreamDecoder};
pub use error::DecodeError;
pub use protocol::{Frame, Usage};
pub use sink::{EventSink, FnSink};
