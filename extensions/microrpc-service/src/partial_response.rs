use crate::BoxError;
use std::fmt;

/// A business error that still carries a result.
///
/// Handlers return it (boxed) when they produced a response *and* failed.
/// The dispatcher recognizes it and sends both the encoded response and the
/// error text, so the caller receives both.
#[derive(Debug)]
pub struct PartialResponse<T> {
    pub response: T,
    pub message: String,
}

impl<T> PartialResponse<T> {
    pub fn new(response: T, message: impl Into<String>) -> Self {
        PartialResponse {
            response,
            message: message.into(),
        }
    }
}

impl<T> PartialResponse<T>
where
    T: fmt::Debug + Send + Sync + 'static,
{
    /// Boxes `self` as a handler error.
    pub fn boxed(response: T, message: impl Into<String>) -> BoxError {
        Box::new(Self::new(response, message))
    }
}

impl<T> fmt::Display for PartialResponse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl<T: fmt::Debug> std::error::Error for PartialResponse<T> {}
