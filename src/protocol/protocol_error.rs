use thiserror::Error;

/// Failures raised while encoding, decoding or reading a wire frame.
///
/// Every variant describes a frame that cannot be trusted; callers treat them
/// as fatal to the connection the bytes came from.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Fewer bytes were supplied than the fixed header or the declared lengths require.
    #[error("truncated frame: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// The frame carries bytes beyond `head_length + body_length`.
    #[error("frame length mismatch: header declares {declared} bytes, got {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// `head_length` is smaller than the minimum the message kind allows.
    #[error("head length {head_length} is below the minimum of {minimum}")]
    HeadLengthTooShort { head_length: u32, minimum: usize },

    /// The declared frame size exceeds the configured maximum.
    #[error("frame of {length} bytes exceeds the limit of {limit} bytes")]
    FrameTooLarge { length: usize, limit: usize },

    /// A name field was not terminated before the end of the header region.
    #[error("missing separator after {0}")]
    MissingSeparator(&'static str),

    /// A meta entry lacks the key/value separator.
    #[error("malformed meta entry")]
    MalformedMeta,

    /// A text field is not valid UTF-8.
    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),

    /// The response does not answer the request that was sent.
    #[error("response message id {actual} does not match request id {expected}")]
    MessageIdMismatch { expected: u32, actual: u32 },

    /// The underlying stream failed while a frame was being read.
    #[error("frame I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
