/// Declares a client-side service description whose fields are
/// [`RpcStub`](crate::RpcStub)s.
///
/// ## Example
///
/// ```rust
/// use microrpc_service::rpc_method;
/// use microrpc_service_caller::{ServiceDescription, rpc_service_client};
///
/// #[derive(serde::Serialize, serde::Deserialize, Debug, Default)]
/// pub struct Req { pub id: u64 }
///
/// #[derive(serde::Serialize, serde::Deserialize, Debug, Default)]
/// pub struct Resp { pub msg: String }
///
/// rpc_method!(pub GetById("GetById"): Req => Resp);
///
/// rpc_service_client! {
///     pub struct UserServiceClient("user-service") {
///         pub get_by_id: GetById,
///     }
/// }
///
/// let mut client = UserServiceClient::default();
/// assert_eq!(client.name(), "user-service");
/// assert_eq!(client.method_slots().len(), 1);
/// ```
#[macro_export]
macro_rules! rpc_service_client {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident($service_name:literal) {
            $($field_vis:vis $field:ident: $method:ty),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Default)]
        $vis struct $name {
            $($field_vis $field: $crate::RpcStub<$method>,)*
        }

        impl $crate::ServiceDescription for $name {
            fn name(&self) -> &str {
                $service_name
            }

            fn method_slots(&mut self) -> ::std::vec::Vec<&mut dyn $crate::MethodSlot> {
                ::std::vec![$(&mut self.$field as &mut dyn $crate::MethodSlot),*]
            }
        }
    };
}
