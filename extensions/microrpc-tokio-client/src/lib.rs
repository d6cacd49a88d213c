mod client_options;
pub use client_options::*;

mod connection_pool;
pub use connection_pool::*;

mod pool_config;
pub use pool_config::*;

mod pool_error;
pub use pool_error::*;

mod rpc_client;
pub use rpc_client::*;

mod tcp_connector;
pub use tcp_connector::*;
