use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

/// Describes one remote method: its wire name and its argument and result types.
///
/// Both the client stub and the server-side method table are keyed by
/// [`RpcMethod::METHOD_NAME`], so the two ends agree on a method by sharing
/// the implementing type.
pub trait RpcMethod: Send + Sync + 'static {
    /// Name written into the request's `method_name` field.
    const METHOD_NAME: &'static str;

    /// The call argument. `Default` supplies the zero value used when a
    /// request arrives without payload bytes.
    type Request: Serialize + DeserializeOwned + Default + Debug + Send + Sync + 'static;

    /// The call result.
    type Response: Serialize + DeserializeOwned + Debug + Send + Sync + 'static;
}
