use crate::RpcCallerError;
use microrpc_service::Context;

/// Performs one request/response exchange.
///
/// Implementations own connection management; stubs only hand over an
/// encoded request frame and expect exactly one encoded response frame back.
/// Errors are returned as-is and never retried here.
#[async_trait::async_trait]
pub trait RpcTransport: Send + Sync {
    async fn send(&self, ctx: &Context, request_frame: Vec<u8>) -> Result<Vec<u8>, RpcCallerError>;
}
