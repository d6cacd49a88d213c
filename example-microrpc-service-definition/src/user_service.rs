use microrpc_service::rpc_method;
use microrpc_service_caller::rpc_service_client;
use serde::{Deserialize, Serialize};

pub const USER_SERVICE_NAME: &str = "user-service";

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Req {
    pub id: u64,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Resp {
    pub msg: String,
}

rpc_method!(
    /// Looks a user up by id.
    pub GetById("GetById"): Req => Resp
);

rpc_service_client! {
    /// Client-side description of `user-service`.
    pub struct UserServiceClient("user-service") {
        pub get_by_id: GetById,
    }
}
