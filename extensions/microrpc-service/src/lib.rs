mod context;
pub use context::*;

mod macros;
pub use macros::*;

mod partial_response;
pub use partial_response::*;

mod rpc_method;
pub use rpc_method::*;

/// Error type returned by service handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
