use crate::{
    DispatchError, MethodOutcome, MethodTable, RpcServiceEndpointError, RpcServiceHandler,
};
use futures::FutureExt;
use microrpc::protocol::{Request, Response};
use microrpc_serializer::{Serializer, SerializerRegistry};
use microrpc_service::Context;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Routes decoded requests to registered services.
///
/// Registration takes `&mut self` and is expected to finish before serving;
/// [`RpcServiceEndpoint::invoke`] only reads, so a shared endpoint needs no
/// locking. Every request yields a response: dispatch failures and handler
/// panics become error text rather than connection failures.
pub struct RpcServiceEndpoint {
    services: HashMap<String, MethodTable>,
    serializers: SerializerRegistry,
}

impl Default for RpcServiceEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl RpcServiceEndpoint {
    /// Creates an endpoint that understands JSON payloads.
    pub fn new() -> Self {
        RpcServiceEndpoint {
            services: HashMap::new(),
            serializers: SerializerRegistry::with_defaults(),
        }
    }

    pub fn register_service<S>(&mut self, service: Arc<S>) -> Result<(), RpcServiceEndpointError>
    where
        S: RpcServiceHandler,
    {
        let name = service.name().to_string();
        if name.is_empty() {
            return Err(RpcServiceEndpointError::EmptyServiceName);
        }

        let entry = match self.services.entry(name) {
            Entry::Occupied(entry) => {
                return Err(RpcServiceEndpointError::DuplicateService(
                    entry.key().clone(),
                ));
            }
            Entry::Vacant(entry) => entry,
        };

        let mut methods = MethodTable::new();
        service.register_methods(&mut methods)?;
        if methods.is_empty() {
            return Err(RpcServiceEndpointError::NoMethods(entry.into_key()));
        }

        tracing::debug!(
            service = %entry.key(),
            methods = ?methods.method_names(),
            "registered service"
        );
        entry.insert(methods);

        Ok(())
    }

    /// Adds a payload codec, replacing any with the same code.
    pub fn register_serializer(
        &mut self,
        serializer: Arc<dyn Serializer>,
    ) -> Option<Arc<dyn Serializer>> {
        self.serializers.register(serializer)
    }

    pub fn has_service(&self, service_name: &str) -> bool {
        self.services.contains_key(service_name)
    }

    /// Registered service names, sorted.
    pub fn service_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn serializers(&self) -> &SerializerRegistry {
        &self.serializers
    }

    /// Runs the method named by `request` and builds its response.
    ///
    /// The response echoes the request's message id and codec bytes and has
    /// its lengths computed. The handler runs under a fresh context carrying
    /// the request's meta.
    pub async fn invoke(&self, request: Request) -> Response {
        let mut response = Response::reply_to(&request);

        match self.dispatch(request).await {
            Ok(MethodOutcome { data, error }) => {
                response.data = data;
                if let Some(error) = error {
                    response.set_error(error);
                }
            }
            Err(err) => {
                tracing::warn!(
                    message_id = response.message_id,
                    error = %err,
                    "dispatch failed"
                );
                response.set_error(err.to_string());
            }
        }

        response.calculate_lengths();
        response
    }

    async fn dispatch(&self, request: Request) -> Result<MethodOutcome, DispatchError> {
        let Request {
            service_name,
            method_name,
            serializer,
            meta,
            data,
            ..
        } = request;

        let methods = self
            .services
            .get(&service_name)
            .ok_or_else(|| DispatchError::ServiceNotFound(service_name.clone()))?;

        let invoker = methods
            .get(&method_name)
            .ok_or_else(|| DispatchError::MethodNotFound {
                service: service_name.clone(),
                method: method_name.clone(),
            })?;

        let serializer = self
            .serializers
            .get(serializer)
            .map_err(DispatchError::UnsupportedSerializer)?;

        let ctx = Context::background().with_metadata_map(meta);

        let outcome = AssertUnwindSafe(invoker(ctx, serializer, data))
            .catch_unwind()
            .await
            .map_err(|_| DispatchError::Panicked(format!("{service_name}.{method_name}")))??;

        tracing::debug!(
            service = %service_name,
            method = %method_name,
            has_error = outcome.error.is_some(),
            "dispatched request"
        );

        Ok(outcome)
    }
}
