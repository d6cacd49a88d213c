use microrpc::protocol::ProtocolError;
use microrpc_serializer::SerializerError;
use microrpc_service::{BoxError, ContextError};
use std::io;
use thiserror::Error;

/// Represents errors that can occur during an RPC call from the perspective of the caller.
#[derive(Debug, Error)]
pub enum RpcCallerError {
    /// Dialing, writing or reading the connection failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The transport could not provide a connection (e.g. its pool is closed).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The response frame was malformed or answered a different request.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The argument could not be encoded or the result could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] SerializerError),

    /// The remote side reported an error: a dispatch failure (unknown
    /// service, unknown method, unsupported serializer, bad argument) or a
    /// business error returned by the method itself.
    #[error("{0}")]
    Remote(String),

    /// The caller's context was cancelled or its deadline passed.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The stub was called before its service description was bound.
    #[error("method `{0}` is not bound to a transport")]
    Unbound(&'static str),

    /// The response carried neither a result nor an error.
    #[error("response carried neither a result nor an error")]
    EmptyResponse,
}

impl RpcCallerError {
    /// The remote error text, if the remote side said no.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            RpcCallerError::Remote(message) => Some(message),
            _ => None,
        }
    }

    /// Whether the caller gave up waiting, as opposed to the remote refusing.
    pub fn is_context_error(&self) -> bool {
        matches!(self, RpcCallerError::Context(_))
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, RpcCallerError::Context(ContextError::DeadlineExceeded))
    }
}
