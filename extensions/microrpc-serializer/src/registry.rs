use crate::{JsonSerializer, Serializer, SerializerError};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps wire codes to serializers.
///
/// Populated before serving starts and only read afterwards, so lookups need
/// no synchronization.
#[derive(Clone, Default)]
pub struct SerializerRegistry {
    serializers: HashMap<u8, Arc<dyn Serializer>>,
}

impl SerializerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the JSON serializer.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonSerializer));
        registry
    }

    /// Registers `serializer` under its own code, returning the serializer it
    /// replaced, if any.
    pub fn register(&mut self, serializer: Arc<dyn Serializer>) -> Option<Arc<dyn Serializer>> {
        let code = serializer.code();
        tracing::debug!(code, name = serializer.name(), "registered serializer");
        self.serializers.insert(code, serializer)
    }

    pub fn get(&self, code: u8) -> Result<Arc<dyn Serializer>, SerializerError> {
        self.serializers
            .get(&code)
            .cloned()
            .ok_or(SerializerError::Unsupported(code))
    }

    pub fn contains(&self, code: u8) -> bool {
        self.serializers.contains_key(&code)
    }

    /// Registered codes in ascending order.
    pub fn codes(&self) -> Vec<u8> {
        let mut codes: Vec<u8> = self.serializers.keys().copied().collect();
        codes.sort_unstable();
        codes
    }
}

impl std::fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("codes", &self.codes())
            .finish()
    }
}
