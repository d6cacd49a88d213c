use crate::{RpcCallerError, RpcTransport};
use microrpc::protocol::{ProtocolError, Request, Response};
use microrpc::utils::next_message_id;
use microrpc_serializer::Serializer;
use microrpc_service::Context;
use std::fmt;
use std::sync::Arc;

/// What every stub of one bound service shares: the service name, the
/// transport and the serializer used for arguments and results.
pub struct ProxyBinding {
    service_name: String,
    transport: Arc<dyn RpcTransport>,
    serializer: Arc<dyn Serializer>,
    compress: u8,
}

impl ProxyBinding {
    pub fn new(
        service_name: impl Into<String>,
        transport: Arc<dyn RpcTransport>,
        serializer: Arc<dyn Serializer>,
    ) -> Self {
        ProxyBinding {
            service_name: service_name.into(),
            transport,
            serializer,
            compress: microrpc::constants::COMPRESS_NONE,
        }
    }

    /// Sets the compression byte stamped on outgoing requests. Payloads are
    /// never actually compressed; the byte is carried for the remote side.
    pub fn with_compress(mut self, compress: u8) -> Self {
        self.compress = compress;
        self
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn serializer(&self) -> &Arc<dyn Serializer> {
        &self.serializer
    }

    /// Sends already-serialized argument bytes to `method_name` and returns
    /// the decoded response.
    ///
    /// The request carries a fresh message id and the context's metadata. A
    /// response answering any other id is rejected.
    pub async fn call_raw(
        &self,
        ctx: &Context,
        method_name: &str,
        data: Vec<u8>,
    ) -> Result<Response, RpcCallerError> {
        let mut request = Request::new(self.service_name.as_str(), method_name);
        request.message_id = next_message_id();
        request.compress = self.compress;
        request.serializer = self.serializer.code();
        request.meta = ctx.metadata().clone();
        request.data = data;
        request.calculate_lengths();

        tracing::trace!(
            service = %self.service_name,
            method = method_name,
            message_id = request.message_id,
            "sending request"
        );

        let frame = self.transport.send(ctx, request.encode()).await?;
        let response = Response::decode(&frame)?;

        if response.message_id != request.message_id {
            return Err(ProtocolError::MessageIdMismatch {
                expected: request.message_id,
                actual: response.message_id,
            }
            .into());
        }

        Ok(response)
    }
}

impl fmt::Debug for ProxyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyBinding")
            .field("service_name", &self.service_name)
            .field("serializer", &self.serializer.name())
            .field("compress", &self.compress)
            .finish()
    }
}
