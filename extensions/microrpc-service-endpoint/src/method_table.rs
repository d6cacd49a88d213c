use crate::{DispatchError, RpcServiceEndpointError};
use microrpc_serializer::{Serializer, SerializerExt};
use microrpc_service::{BoxError, Context, PartialResponse, RpcMethod};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// What a method produced: the encoded result, if any, and the business
/// error text, if any. Both may be present.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MethodOutcome {
    pub data: Vec<u8>,
    pub error: Option<String>,
}

pub type RpcMethodFuture =
    Pin<Box<dyn Future<Output = Result<MethodOutcome, DispatchError>> + Send>>;

/// Decodes the argument bytes with the given serializer, runs the method and
/// encodes its result.
pub type RpcMethodInvoker =
    Arc<dyn Fn(Context, Arc<dyn Serializer>, Vec<u8>) -> RpcMethodFuture + Send + Sync>;

/// The methods of one service, keyed by method name.
#[derive(Default)]
pub struct MethodTable {
    methods: HashMap<&'static str, RpcMethodInvoker>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under [`RpcMethod::METHOD_NAME`].
    ///
    /// The handler receives a fresh context and the decoded argument, or
    /// `M::Request::default()` when the request carried no payload. To send
    /// a result together with an error, return
    /// [`PartialResponse::boxed`](microrpc_service::PartialResponse::boxed).
    pub fn add<M, F, Fut>(&mut self, handler: F) -> Result<(), RpcServiceEndpointError>
    where
        M: RpcMethod,
        F: Fn(Context, M::Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<M::Response, BoxError>> + Send + 'static,
    {
        let entry = match self.methods.entry(M::METHOD_NAME) {
            Entry::Occupied(_) => {
                return Err(RpcServiceEndpointError::DuplicateMethod(M::METHOD_NAME));
            }
            Entry::Vacant(entry) => entry,
        };

        let handler = Arc::new(handler);
        let invoker = move |ctx: Context, serializer: Arc<dyn Serializer>, data: Vec<u8>| {
            Box::pin(invoke_method::<M, F, Fut>(handler.clone(), ctx, serializer, data))
                as RpcMethodFuture
        };

        entry.insert(Arc::new(invoker));
        Ok(())
    }

    pub fn get(&self, method_name: &str) -> Option<&RpcMethodInvoker> {
        self.methods.get(method_name)
    }

    pub fn contains(&self, method_name: &str) -> bool {
        self.methods.contains_key(method_name)
    }

    /// Registered method names, sorted.
    pub fn method_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.methods.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

async fn invoke_method<M, F, Fut>(
    handler: Arc<F>,
    ctx: Context,
    serializer: Arc<dyn Serializer>,
    data: Vec<u8>,
) -> Result<MethodOutcome, DispatchError>
where
    M: RpcMethod,
    F: Fn(Context, M::Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<M::Response, BoxError>> + Send + 'static,
{
    let request = if data.is_empty() {
        M::Request::default()
    } else {
        serializer
            .decode_value::<M::Request>(&data)
            .map_err(|source| DispatchError::InvalidArgument {
                method: M::METHOD_NAME,
                source,
            })?
    };

    let (response, error) = match (*handler)(ctx, request).await {
        Ok(response) => (Some(response), None),
        Err(err) => match err.downcast::<PartialResponse<M::Response>>() {
            Ok(partial) => {
                let PartialResponse { response, message } = *partial;
                (Some(response), Some(message))
            }
            Err(err) => (None, Some(err.to_string())),
        },
    };

    let data = match response {
        Some(response) => {
            serializer
                .encode_value(&response)
                .map_err(|source| DispatchError::EncodeResult {
                    method: M::METHOD_NAME,
                    source,
                })?
        }
        None => Vec::new(),
    };

    Ok(MethodOutcome { data, error })
}
