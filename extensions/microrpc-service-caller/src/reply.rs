use crate::RpcCallerError;

/// The full outcome of a call.
///
/// A remote business error may arrive together with a result, so both halves
/// are kept: exactly one of them is `None` unless the remote method failed
/// after producing a value.
#[derive(Debug)]
pub struct RpcReply<T> {
    pub value: Option<T>,
    pub error: Option<RpcCallerError>,
}

impl<T> RpcReply<T> {
    pub fn ok(value: T) -> Self {
        RpcReply {
            value: Some(value),
            error: None,
        }
    }

    pub fn failed(error: impl Into<RpcCallerError>) -> Self {
        RpcReply {
            value: None,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.value.is_some()
    }

    pub fn into_parts(self) -> (Option<T>, Option<RpcCallerError>) {
        (self.value, self.error)
    }

    /// Collapses the reply, preferring the error when both halves are present.
    pub fn into_result(self) -> Result<T, RpcCallerError> {
        match (self.value, self.error) {
            (_, Some(error)) => Err(error),
            (Some(value), None) => Ok(value),
            (None, None) => Err(RpcCallerError::EmptyResponse),
        }
    }
}
