use crate::{MethodSlot, ProxyBinding, RpcTransport};
use microrpc_serializer::Serializer;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("service name must not be empty")]
    EmptyServiceName,

    #[error("service `{0}` declares no callable methods")]
    NoMethodSlots(String),

    #[error("service `{service}` declares method `{method}` more than once")]
    DuplicateMethod { service: String, method: String },
}

/// A client-side description of a remote service: its name and one
/// [`MethodSlot`] per remote method.
///
/// Usually produced by [`rpc_service_client!`](crate::rpc_service_client).
pub trait ServiceDescription: Send + Sync {
    fn name(&self) -> &str;

    fn method_slots(&mut self) -> Vec<&mut dyn MethodSlot>;
}

/// Wires every method slot of `description` to `transport`.
///
/// All slots share one [`ProxyBinding`]. Nothing is bound unless the whole
/// description is valid.
pub fn bind_service<S>(
    description: &mut S,
    transport: Arc<dyn RpcTransport>,
    serializer: Arc<dyn Serializer>,
) -> Result<(), BindError>
where
    S: ServiceDescription + ?Sized,
{
    let binding = ProxyBinding::new(description.name(), transport, serializer);
    bind_service_with(description, binding)
}

/// Checks that `description` can be bound: a non-empty name and at least one
/// method slot, with no method name repeated. Touches nothing else.
pub fn validate_description<S>(description: &mut S) -> Result<(), BindError>
where
    S: ServiceDescription + ?Sized,
{
    let service_name = description.name().to_string();
    if service_name.is_empty() {
        return Err(BindError::EmptyServiceName);
    }

    let slots = description.method_slots();
    if slots.is_empty() {
        return Err(BindError::NoMethodSlots(service_name));
    }

    let mut seen = HashSet::with_capacity(slots.len());
    for slot in &slots {
        if !seen.insert(slot.method_name()) {
            return Err(BindError::DuplicateMethod {
                service: service_name,
                method: slot.method_name().to_string(),
            });
        }
    }

    Ok(())
}

/// Like [`bind_service`], with a caller-configured binding.
pub fn bind_service_with<S>(description: &mut S, binding: ProxyBinding) -> Result<(), BindError>
where
    S: ServiceDescription + ?Sized,
{
    validate_description(description)?;

    let binding = Arc::new(binding);
    let mut slots = description.method_slots();
    for slot in slots.iter_mut() {
        slot.bind(binding.clone());
    }

    tracing::debug!(
        service = binding.service_name(),
        methods = slots.len(),
        serializer = binding.serializer().name(),
        "bound service proxy"
    );

    Ok(())
}
