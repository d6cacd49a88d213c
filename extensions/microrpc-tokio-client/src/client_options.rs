use crate::{DEFAULT_DIAL_TIMEOUT, PoolConfig};
use microrpc::constants::{COMPRESS_NONE, MAX_FRAME_LENGTH};
use microrpc_serializer::{JsonSerializer, Serializer};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Settings for an [`RpcClient`](crate::RpcClient).
///
/// Defaults: JSON payloads, [`PoolConfig::default`], a 3 second dial timeout
/// and no compression.
#[derive(Clone)]
pub struct ClientOptions {
    pub(crate) serializer: Arc<dyn Serializer>,
    pub(crate) pool_config: PoolConfig,
    pub(crate) dial_timeout: Duration,
    pub(crate) compress: u8,
    pub(crate) max_frame_length: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            serializer: Arc::new(JsonSerializer),
            pool_config: PoolConfig::default(),
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            compress: COMPRESS_NONE,
            max_frame_length: MAX_FRAME_LENGTH,
        }
    }
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The payload codec. The server must have the same code registered.
    pub fn with_serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn with_pool_config(mut self, pool_config: PoolConfig) -> Self {
        self.pool_config = pool_config;
        self
    }

    pub fn with_dial_timeout(mut self, dial_timeout: Duration) -> Self {
        self.dial_timeout = dial_timeout;
        self
    }

    /// The compression byte stamped on requests.
    pub fn with_compress(mut self, compress: u8) -> Self {
        self.compress = compress;
        self
    }

    /// Largest response frame accepted before the connection is dropped.
    pub fn with_max_frame_length(mut self, max_frame_length: usize) -> Self {
        self.max_frame_length = max_frame_length;
        self
    }

    pub fn serializer(&self) -> &Arc<dyn Serializer> {
        &self.serializer
    }

    pub fn pool_config(&self) -> &PoolConfig {
        &self.pool_config
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("serializer", &self.serializer.name())
            .field("pool_config", &self.pool_config)
            .field("dial_timeout", &self.dial_timeout)
            .field("compress", &self.compress)
            .field("max_frame_length", &self.max_frame_length)
            .finish()
    }
}
