mod endpoint;
pub use endpoint::*;

pub mod error;
pub use error::{DispatchError, RpcServiceEndpointError};

mod method_table;
pub use method_table::*;

mod service_handler;
pub use service_handler::*;
