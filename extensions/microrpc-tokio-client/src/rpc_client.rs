use crate::{ClientOptions, ConnectionPool, PoolError, PoolStats, TcpConnector};
use microrpc::protocol::{ProtocolError, frame_message_id, read_frame};
use microrpc_serializer::Serializer;
use microrpc_service::Context;
use microrpc_service_caller::{
    BindError, ProxyBinding, RpcCallerError, RpcTransport, ServiceDescription,
    bind_service_with, validate_description,
};
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

#[derive(Debug, Error)]
pub enum RpcClientInitError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl From<PoolError> for RpcCallerError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::Context(err) => RpcCallerError::Context(err),
            PoolError::Factory(err) => RpcCallerError::Io(err),
            other => RpcCallerError::Transport(Box::new(other)),
        }
    }
}

/// A pooled TCP transport to one server address.
///
/// Each call borrows a connection, writes one request frame and reads one
/// response frame. Connections that fail mid-exchange, or whose call runs
/// out of time, are closed rather than reused.
pub struct RpcClient {
    addr: String,
    pool: ConnectionPool<TcpConnector>,
    serializer: Arc<dyn Serializer>,
    compress: u8,
    max_frame_length: usize,
}

impl RpcClient {
    /// Creates the connection pool for `addr`. Only `init_capacity`
    /// connections are dialed here; the rest are dialed on demand.
    pub async fn connect(
        addr: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Arc<RpcClient>, PoolError> {
        let addr = addr.into();
        let connector = TcpConnector::new(addr.clone()).with_dial_timeout(options.dial_timeout);
        let pool = ConnectionPool::new(connector, options.pool_config).await?;

        tracing::info!(%addr, serializer = options.serializer.name(), "rpc client ready");

        Ok(Arc::new(RpcClient {
            addr,
            pool,
            serializer: options.serializer,
            compress: options.compress,
            max_frame_length: options.max_frame_length,
        }))
    }

    /// Binds every method slot of `description` to this client.
    pub fn bind<S>(self: &Arc<Self>, description: &mut S) -> Result<(), BindError>
    where
        S: ServiceDescription + ?Sized,
    {
        let binding = ProxyBinding::new(
            description.name(),
            self.clone(),
            self.serializer.clone(),
        )
        .with_compress(self.compress);

        bind_service_with(description, binding)
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Closes the underlying pool. In-flight calls finish; later calls fail.
    pub fn close(&self) {
        self.pool.close();
    }

    /// Writes one request frame and reads its response frame, which must
    /// carry the request's message id.
    async fn exchange(
        stream: &mut TcpStream,
        request_frame: &[u8],
        max_frame_length: usize,
    ) -> Result<Vec<u8>, RpcCallerError> {
        let expected = frame_message_id(request_frame)?;
        stream.write_all(request_frame).await?;

        let Some(frame) = read_frame(stream, max_frame_length).await? else {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "server closed the connection before responding",
            )
            .into());
        };

        let actual = frame_message_id(&frame)?;
        if actual != expected {
            return Err(ProtocolError::MessageIdMismatch { expected, actual }.into());
        }

        Ok(frame)
    }
}

#[async_trait::async_trait]
impl RpcTransport for RpcClient {
    async fn send(&self, ctx: &Context, request_frame: Vec<u8>) -> Result<Vec<u8>, RpcCallerError> {
        let mut connection = self.pool.acquire(ctx).await?;

        let outcome = ctx
            .run(Self::exchange(
                &mut connection,
                &request_frame,
                self.max_frame_length,
            ))
            .await;

        match outcome {
            Ok(Ok(response_frame)) => {
                connection.release();
                Ok(response_frame)
            }
            Ok(Err(err)) => {
                tracing::warn!(addr = %self.addr, error = %err, "rpc exchange failed");
                connection.discard();
                Err(err)
            }
            Err(err) => {
                connection.discard();
                Err(err.into())
            }
        }
    }
}

/// Connects to `addr` and binds `description` to the new client.
///
/// The description is checked before anything is dialed.
pub async fn init_client_proxy<S>(
    addr: impl Into<String>,
    description: &mut S,
    options: ClientOptions,
) -> Result<Arc<RpcClient>, RpcClientInitError>
where
    S: ServiceDescription + ?Sized,
{
    validate_description(description)?;

    let client = RpcClient::connect(addr, options).await?;
    client.bind(description)?;

    Ok(client)
}
