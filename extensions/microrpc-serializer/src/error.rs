use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializerError {
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bitcode serialization failed: {0}")]
    Bitcode(#[from] bitcode::Error),

    /// A binary value stream decoded cleanly but does not describe a value.
    #[error("malformed value stream: {0}")]
    MalformedStream(&'static str),

    /// No serializer is registered under the requested code.
    #[error("unsupported serializer: code {0}")]
    Unsupported(u8),
}
