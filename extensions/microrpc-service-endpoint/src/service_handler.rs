use crate::{MethodTable, RpcServiceEndpointError};
use std::sync::Arc;

/// A server-side service implementation.
///
/// `register_methods` runs once, at registration, and fills the table with
/// one entry per exposed method. Handlers usually capture a clone of `self`.
///
/// ```rust
/// use example_microrpc_service_definition::{GetById, Req, Resp};
/// use microrpc_service::{BoxError, Context};
/// use microrpc_service_endpoint::{MethodTable, RpcServiceEndpointError, RpcServiceHandler};
/// use std::sync::Arc;
///
/// struct UserService;
///
/// impl UserService {
///     async fn get_by_id(&self, _ctx: Context, req: Req) -> Result<Resp, BoxError> {
///         Ok(Resp { msg: format!("user {}", req.id) })
///     }
/// }
///
/// impl RpcServiceHandler for UserService {
///     fn name(&self) -> &str {
///         "user-service"
///     }
///
///     fn register_methods(
///         self: Arc<Self>,
///         methods: &mut MethodTable,
///     ) -> Result<(), RpcServiceEndpointError> {
///         methods.add::<GetById, _, _>(move |ctx, req| {
///             let service = self.clone();
///             async move { service.get_by_id(ctx, req).await }
///         })
///     }
/// }
/// ```
pub trait RpcServiceHandler: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn register_methods(
        self: Arc<Self>,
        methods: &mut MethodTable,
    ) -> Result<(), RpcServiceEndpointError>;
}
