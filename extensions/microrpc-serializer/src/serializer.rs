use crate::SerializerError;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// A payload codec identified on the wire by a one-byte code.
///
/// Serializers operate on [`serde_json::Value`] as a neutral data model so
/// they can be stored as trait objects and chosen at runtime from the code
/// carried by each request. Typed values go through [`SerializerExt`].
pub trait Serializer: Send + Sync {
    /// The code written into the `serializer` byte of every message.
    fn code(&self) -> u8;

    /// Human readable name, used in logs.
    fn name(&self) -> &'static str;

    fn encode(&self, value: &Value) -> Result<Vec<u8>, SerializerError>;

    fn decode(&self, bytes: &[u8]) -> Result<Value, SerializerError>;
}

/// Typed helpers available on every [`Serializer`], including `dyn Serializer`.
pub trait SerializerExt: Serializer {
    fn encode_value<T>(&self, value: &T) -> Result<Vec<u8>, SerializerError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        self.encode(&value)
    }

    fn decode_value<T>(&self, bytes: &[u8]) -> Result<T, SerializerError>
    where
        T: DeserializeOwned,
    {
        let value = self.decode(bytes)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Decodes `bytes` over an existing value, replacing it on success and
    /// leaving it untouched on failure.
    fn decode_into<T>(&self, bytes: &[u8], target: &mut T) -> Result<(), SerializerError>
    where
        T: DeserializeOwned,
    {
        *target = self.decode_value(bytes)?;
        Ok(())
    }
}

impl<S: Serializer + ?Sized> SerializerExt for S {}
