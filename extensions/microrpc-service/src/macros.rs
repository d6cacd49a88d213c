/// Declares a unit struct implementing [`RpcMethod`](crate::RpcMethod).
///
/// ## Example
///
/// ```rust
/// use microrpc_service::{RpcMethod, rpc_method};
///
/// #[derive(serde::Serialize, serde::Deserialize, Debug, Default)]
/// pub struct Req { pub id: u64 }
///
/// #[derive(serde::Serialize, serde::Deserialize, Debug, Default)]
/// pub struct Resp { pub msg: String }
///
/// rpc_method!(pub GetById("GetById"): Req => Resp);
///
/// assert_eq!(GetById::METHOD_NAME, "GetById");
/// ```
#[macro_export]
macro_rules! rpc_method {
    ($(#[$attr:meta])* $vis:vis $name:ident($method_name:literal): $request:ty => $response:ty) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $name;

        impl $crate::RpcMethod for $name {
            const METHOD_NAME: &'static str = $method_name;
            type Request = $request;
            type Response = $response;
        }
    };
}
