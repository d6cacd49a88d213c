mod binding;
pub use binding::*;

pub mod error;
pub use error::RpcCallerError;

mod macros;
pub use macros::*;

mod reply;
pub use reply::*;

mod service_description;
pub use service_description::*;

mod stub;
pub use stub::*;

mod transport;
pub use transport::*;
