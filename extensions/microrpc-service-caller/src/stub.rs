use crate::{ProxyBinding, RpcCallerError, RpcReply};
use microrpc_serializer::SerializerExt;
use microrpc_service::{Context, RpcMethod};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A slot in a service description that can be wired to a transport.
pub trait MethodSlot: Send + Sync {
    fn method_name(&self) -> &'static str;

    fn bind(&mut self, binding: Arc<ProxyBinding>);

    fn is_bound(&self) -> bool;
}

/// Client-side stand-in for one remote method.
///
/// A stub starts unbound. Once its description is bound, [`RpcStub::invoke`]
/// serializes the argument, sends it and decodes whatever comes back.
pub struct RpcStub<M: RpcMethod> {
    binding: Option<Arc<ProxyBinding>>,
    _method: PhantomData<fn() -> M>,
}

impl<M: RpcMethod> Default for RpcStub<M> {
    fn default() -> Self {
        RpcStub {
            binding: None,
            _method: PhantomData,
        }
    }
}

impl<M: RpcMethod> fmt::Debug for RpcStub<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcStub")
            .field("method", &M::METHOD_NAME)
            .field("binding", &self.binding)
            .finish()
    }
}

impl<M: RpcMethod> RpcStub<M> {
    /// Calls the remote method and returns both halves of the outcome.
    ///
    /// The context is checked before anything is sent and again once the
    /// response arrives, so a call whose deadline passed in flight reports
    /// the context error rather than a late result.
    pub async fn invoke(&self, ctx: &Context, request: &M::Request) -> RpcReply<M::Response> {
        let Some(binding) = self.binding.as_ref() else {
            return RpcReply::failed(RpcCallerError::Unbound(M::METHOD_NAME));
        };

        if let Some(err) = ctx.err() {
            return RpcReply::failed(err);
        }

        let data = match binding.serializer().encode_value(request) {
            Ok(data) => data,
            Err(err) => return RpcReply::failed(err),
        };

        let response = match binding.call_raw(ctx, M::METHOD_NAME, data).await {
            Ok(response) => response,
            Err(err) => return RpcReply::failed(err),
        };

        if let Some(err) = ctx.err() {
            return RpcReply::failed(err);
        }

        let error = response.error_message().map(RpcCallerError::Remote);

        if response.data.is_empty() {
            return RpcReply { value: None, error };
        }

        match binding.serializer().decode_value::<M::Response>(&response.data) {
            Ok(value) => RpcReply {
                value: Some(value),
                error,
            },
            Err(err) => RpcReply {
                value: None,
                error: Some(error.unwrap_or(err.into())),
            },
        }
    }

    /// Like [`RpcStub::invoke`], but collapses the outcome into a `Result`.
    pub async fn call(
        &self,
        ctx: &Context,
        request: &M::Request,
    ) -> Result<M::Response, RpcCallerError> {
        self.invoke(ctx, request).await.into_result()
    }
}

impl<M: RpcMethod> MethodSlot for RpcStub<M> {
    fn method_name(&self) -> &'static str {
        M::METHOD_NAME
    }

    fn bind(&mut self, binding: Arc<ProxyBinding>) {
        self.binding = Some(binding);
    }

    fn is_bound(&self) -> bool {
        self.binding.is_some()
    }
}
