use microrpc_serializer::SerializerError;
use thiserror::Error;

/// Registration-time failures.
#[derive(Debug, Error)]
pub enum RpcServiceEndpointError {
    #[error("service name must not be empty")]
    EmptyServiceName,

    #[error("service `{0}` is already registered")]
    DuplicateService(String),

    #[error("service `{0}` registers no methods")]
    NoMethods(String),

    #[error("method `{0}` is already registered")]
    DuplicateMethod(&'static str),
}

/// Failures that stop a request from reaching or completing its method.
///
/// These are reported to the caller in the response's error field; the
/// connection keeps serving.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("service not found: {0}")]
    ServiceNotFound(String),

    #[error("method not found: {service}.{method}")]
    MethodNotFound { service: String, method: String },

    #[error(transparent)]
    UnsupportedSerializer(SerializerError),

    #[error("invalid argument for {method}: {source}")]
    InvalidArgument {
        method: &'static str,
        #[source]
        source: SerializerError,
    },

    #[error("failed to encode result of {method}: {source}")]
    EncodeResult {
        method: &'static str,
        #[source]
        source: SerializerError,
    },

    #[error("method {0} panicked")]
    Panicked(String),
}
