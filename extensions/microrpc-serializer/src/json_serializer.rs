use crate::{JSON_SERIALIZER_CODE, Serializer, SerializerError};
use serde_json::Value;

/// The default serializer: UTF-8 JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn code(&self) -> u8 {
        JSON_SERIALIZER_CODE
    }

    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, SerializerError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, SerializerError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
