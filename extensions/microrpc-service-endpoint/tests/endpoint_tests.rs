use example_microrpc_service_definition::{GetById, Req, Resp, USER_SERVICE_NAME};
use microrpc::protocol::{Request, Response};
use microrpc_serializer::{BitcodeSerializer, JsonSerializer, Serializer, SerializerExt};
use microrpc_service::{BoxError, Context, PartialResponse, rpc_method};
use microrpc_service_endpoint::{
    MethodTable, RpcServiceEndpoint, RpcServiceEndpointError, RpcServiceHandler,
};
use std::sync::Arc;

rpc_method!(Explode("Explode"): Req => Resp);
rpc_method!(WhoAmI("WhoAmI"): Req => Resp);

struct UserService;

impl UserService {
    async fn get_by_id(&self, _ctx: Context, req: Req) -> Result<Resp, BoxError> {
        match req.id {
            13 => Ok(Resp {
                msg: "hello".into(),
            }),
            0 => Err(PartialResponse::boxed(Resp::default(), "mock error")),
            id => Err(format!("no user {id}").into()),
        }
    }
}

impl RpcServiceHandler for UserService {
    fn name(&self) -> &str {
        USER_SERVICE_NAME
    }

    fn register_methods(
        self: Arc<Self>,
        methods: &mut MethodTable,
    ) -> Result<(), RpcServiceEndpointError> {
        methods.add::<GetById, _, _>(move |ctx, req| {
            let service = self.clone();
            async move { service.get_by_id(ctx, req).await }
        })?;
        methods.add::<Explode, _, _>(|_ctx, _req| async move {
            if true {
                panic!("boom");
            }
            Ok(Resp::default())
        })?;
        methods.add::<WhoAmI, _, _>(|ctx, _req| async move {
            Ok(Resp {
                msg: ctx.metadata_value("user").unwrap_or("anonymous").to_string(),
            })
        })
    }
}

struct EmptyService;

impl RpcServiceHandler for EmptyService {
    fn name(&self) -> &str {
        "empty-service"
    }

    fn register_methods(
        self: Arc<Self>,
        _methods: &mut MethodTable,
    ) -> Result<(), RpcServiceEndpointError> {
        Ok(())
    }
}

struct TwiceService;

impl RpcServiceHandler for TwiceService {
    fn name(&self) -> &str {
        "twice-service"
    }

    fn register_methods(
        self: Arc<Self>,
        methods: &mut MethodTable,
    ) -> Result<(), RpcServiceEndpointError> {
        methods.add::<GetById, _, _>(|_ctx, _req| async { Ok(Resp::default()) })?;
        methods.add::<GetById, _, _>(|_ctx, _req| async { Ok(Resp::default()) })
    }
}

fn endpoint() -> RpcServiceEndpoint {
    let mut endpoint = RpcServiceEndpoint::new();
    endpoint.register_service(Arc::new(UserService)).unwrap();
    endpoint
}

fn request(service: &str, method: &str, serializer: &dyn Serializer, req: &Req) -> Request {
    let mut request = Request::new(service, method);
    request.message_id = 42;
    request.serializer = serializer.code();
    request.data = serializer.encode_value(req).unwrap();
    request.calculate_lengths();
    request
}

fn decode_resp(response: &Response) -> Resp {
    JsonSerializer.decode_value(&response.data).unwrap()
}

#[tokio::test]
async fn dispatches_to_registered_method() {
    let endpoint = endpoint();
    let response = endpoint
        .invoke(request(USER_SERVICE_NAME, "GetById", &JsonSerializer, &Req { id: 13 }))
        .await;

    assert!(!response.has_error());
    assert_eq!(response.message_id, 42);
    assert_eq!(response.serializer, JsonSerializer.code());
    assert_eq!(
        decode_resp(&response),
        Resp {
            msg: "hello".into()
        }
    );
}

#[tokio::test]
async fn response_lengths_are_computed() {
    let endpoint = endpoint();
    let response = endpoint
        .invoke(request(USER_SERVICE_NAME, "GetById", &JsonSerializer, &Req { id: 13 }))
        .await;

    let encoded = response.encode();
    assert_eq!(
        encoded.len(),
        (response.head_length + response.body_length) as usize
    );
    assert_eq!(Response::decode(&encoded).unwrap(), response);
}

#[tokio::test]
async fn partial_response_carries_result_and_error() {
    let endpoint = endpoint();
    let response = endpoint
        .invoke(request(USER_SERVICE_NAME, "GetById", &JsonSerializer, &Req { id: 0 }))
        .await;

    assert_eq!(response.error_message().as_deref(), Some("mock error"));
    assert_eq!(decode_resp(&response), Resp::default());
}

#[tokio::test]
async fn plain_business_error_has_no_data() {
    let endpoint = endpoint();
    let response = endpoint
        .invoke(request(USER_SERVICE_NAME, "GetById", &JsonSerializer, &Req { id: 7 }))
        .await;

    assert_eq!(response.error_message().as_deref(), Some("no user 7"));
    assert!(response.data.is_empty());
}

#[tokio::test]
async fn unknown_service_is_an_error_response() {
    let endpoint = endpoint();
    let response = endpoint
        .invoke(request("order-service", "GetById", &JsonSerializer, &Req { id: 13 }))
        .await;

    assert!(response.has_error());
    assert!(response.error_message().unwrap().contains("order-service"));
    assert!(response.data.is_empty());
    assert_eq!(response.message_id, 42);
}

#[tokio::test]
async fn unknown_method_is_an_error_response() {
    let endpoint = endpoint();
    let response = endpoint
        .invoke(request(USER_SERVICE_NAME, "Delete", &JsonSerializer, &Req { id: 13 }))
        .await;

    assert!(response.error_message().unwrap().contains("Delete"));
    assert!(response.data.is_empty());
}

#[tokio::test]
async fn unregistered_serializer_is_an_error_response() {
    let endpoint = endpoint();
    let response = endpoint
        .invoke(request(USER_SERVICE_NAME, "GetById", &BitcodeSerializer, &Req { id: 13 }))
        .await;

    assert_eq!(
        response.error_message().as_deref(),
        Some("unsupported serializer: code 2")
    );
    assert!(response.data.is_empty());
}

#[tokio::test]
async fn registered_serializer_is_used_for_both_directions() {
    let mut endpoint = endpoint();
    assert!(endpoint.register_serializer(Arc::new(BitcodeSerializer)).is_none());

    let response = endpoint
        .invoke(request(USER_SERVICE_NAME, "GetById", &BitcodeSerializer, &Req { id: 13 }))
        .await;

    assert!(!response.has_error());
    let resp: Resp = BitcodeSerializer.decode_value(&response.data).unwrap();
    assert_eq!(resp.msg, "hello");
}

#[tokio::test]
async fn undecodable_argument_is_an_error_response() {
    let endpoint = endpoint();
    let mut req = Request::new(USER_SERVICE_NAME, "GetById");
    req.serializer = JsonSerializer.code();
    req.data = b"{\"id\": \"not a number\"}".to_vec();
    req.calculate_lengths();

    let response = endpoint.invoke(req).await;
    assert!(response.error_message().unwrap().contains("GetById"));
    assert!(response.data.is_empty());
}

#[tokio::test]
async fn empty_payload_uses_default_argument() {
    let endpoint = endpoint();
    let mut req = Request::new(USER_SERVICE_NAME, "GetById");
    req.serializer = JsonSerializer.code();
    req.calculate_lengths();

    // `Req::default()` has id 0, which the service answers with "mock error".
    let response = endpoint.invoke(req).await;
    assert_eq!(response.error_message().as_deref(), Some("mock error"));
}

#[tokio::test]
async fn handler_panic_becomes_error_response() {
    let endpoint = endpoint();
    let response = endpoint
        .invoke(request(USER_SERVICE_NAME, "Explode", &JsonSerializer, &Req { id: 1 }))
        .await;

    assert!(response.error_message().unwrap().contains("panicked"));

    let response = endpoint
        .invoke(request(USER_SERVICE_NAME, "GetById", &JsonSerializer, &Req { id: 13 }))
        .await;
    assert!(!response.has_error());
}

#[tokio::test]
async fn request_meta_reaches_handler_context() {
    let endpoint = endpoint();
    let mut req = request(USER_SERVICE_NAME, "WhoAmI", &JsonSerializer, &Req::default());
    req.meta.insert("user".into(), "ada".into());
    req.calculate_lengths();

    let response = endpoint.invoke(req).await;
    assert_eq!(decode_resp(&response).msg, "ada");
}

#[test]
fn duplicate_service_is_rejected() {
    let mut endpoint = endpoint();
    let err = endpoint.register_service(Arc::new(UserService)).unwrap_err();
    assert!(matches!(
        err,
        RpcServiceEndpointError::DuplicateService(name) if name == USER_SERVICE_NAME
    ));
}

#[test]
fn duplicate_method_is_rejected() {
    let mut endpoint = RpcServiceEndpoint::new();
    let err = endpoint.register_service(Arc::new(TwiceService)).unwrap_err();
    assert!(matches!(err, RpcServiceEndpointError::DuplicateMethod("GetById")));
    assert!(!endpoint.has_service("twice-service"));
}

#[test]
fn service_without_methods_is_rejected() {
    let mut endpoint = RpcServiceEndpoint::new();
    let err = endpoint.register_service(Arc::new(EmptyService)).unwrap_err();
    assert!(matches!(err, RpcServiceEndpointError::NoMethods(_)));
    assert!(endpoint.service_names().is_empty());
}

#[test]
fn method_table_lists_sorted_names() {
    let mut methods = MethodTable::new();
    Arc::new(UserService).register_methods(&mut methods).unwrap();
    assert_eq!(methods.method_names(), vec!["Explode", "GetById", "WhoAmI"]);
    assert!(methods.contains("WhoAmI"));
    assert!(methods.get("Missing").is_none());
}
