use microrpc_service::ContextError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("connection pool is closed")]
    Closed,

    /// The caller's context ended before a connection became available.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The connection factory failed; creation is not retried.
    #[error("failed to create connection: {0}")]
    Factory(#[source] io::Error),

    #[error("invalid pool configuration: {0}")]
    InvalidConfig(&'static str),
}
