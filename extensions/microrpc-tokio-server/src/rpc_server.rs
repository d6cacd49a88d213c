//! Note: This `RpcServer` does not include authentication or authorization.
//! Any code holding an [`RpcServiceEndpoint`] can serve requests; this
//! implementation demonstrates one way to do so over plain TCP.

use microrpc::constants::MAX_FRAME_LENGTH;
use microrpc::protocol::{Request, read_frame};
use microrpc_serializer::Serializer;
use microrpc_service_endpoint::{RpcServiceEndpoint, RpcServiceEndpointError, RpcServiceHandler};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

#[derive(Debug, Error)]
pub enum RpcServerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Endpoint(#[from] RpcServiceEndpointError),

    /// Services and serializers must be registered before serving starts.
    #[error("registration is closed once the server is serving")]
    RegistrationClosed,
}

/// An RPC server accepting TCP connections.
///
/// Each accepted connection gets its own task, which reads one request,
/// writes its response and repeats, so responses on a connection come back
/// in request order. A malformed frame closes that connection only.
pub struct RpcServer {
    endpoint: Arc<RpcServiceEndpoint>,
    shutdown: CancellationToken,
    max_frame_length: usize,
}

impl Default for RpcServer {
    fn default() -> Self {
        Self::new()
    }
}

impl RpcServer {
    pub fn new() -> Self {
        RpcServer {
            endpoint: Arc::new(RpcServiceEndpoint::new()),
            shutdown: CancellationToken::new(),
            max_frame_length: MAX_FRAME_LENGTH,
        }
    }

    /// Largest request frame accepted before the connection is dropped.
    pub fn with_max_frame_length(mut self, max_frame_length: usize) -> Self {
        self.max_frame_length = max_frame_length;
        self
    }

    pub fn endpoint(&self) -> Arc<RpcServiceEndpoint> {
        self.endpoint.clone()
    }

    pub fn register_service<S>(&mut self, service: Arc<S>) -> Result<(), RpcServerError>
    where
        S: RpcServiceHandler,
    {
        self.endpoint_mut()?.register_service(service)?;
        Ok(())
    }

    pub fn register_serializer(
        &mut self,
        serializer: Arc<dyn Serializer>,
    ) -> Result<(), RpcServerError> {
        self.endpoint_mut()?.register_serializer(serializer);
        Ok(())
    }

    /// Binds `addr` and serves until [`RpcServer::close`] is called.
    pub async fn start<A: ToSocketAddrs>(&self, addr: A) -> Result<(), RpcServerError> {
        let listener = TcpListener::bind(addr).await?;
        self.serve_with_listener(listener).await
    }

    /// Serves on a pre-bound listener until [`RpcServer::close`] is called
    /// or accepting fails.
    ///
    /// Useful for binding port 0 and reading the real address first.
    pub async fn serve_with_listener(&self, listener: TcpListener) -> Result<(), RpcServerError> {
        let address = listener.local_addr()?;
        tracing::info!("Server running on {:?}", address);

        loop {
            let (stream, peer) = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        tracing::error!("Failed to accept connection on {}: {}", address, err);
                        return Err(err.into());
                    }
                },
            };

            tracing::info!("Client connected: {}", peer);

            let connection = Connection {
                endpoint: self.endpoint.clone(),
                shutdown: self.shutdown.child_token(),
                max_frame_length: self.max_frame_length,
            };
            tokio::spawn(
                connection
                    .serve(stream, peer)
                    .instrument(tracing::info_span!("connection", %peer)),
            );
        }

        tracing::info!("Server on {:?} stopped", address);
        Ok(())
    }

    /// Stops accepting and ends every connection loop after its current request.
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn endpoint_mut(&mut self) -> Result<&mut RpcServiceEndpoint, RpcServerError> {
        Arc::get_mut(&mut self.endpoint).ok_or(RpcServerError::RegistrationClosed)
    }
}

struct Connection {
    endpoint: Arc<RpcServiceEndpoint>,
    shutdown: CancellationToken,
    max_frame_length: usize,
}

impl Connection {
    async fn serve(self, mut stream: TcpStream, peer: SocketAddr) {
        loop {
            let frame = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                frame = read_frame(&mut stream, self.max_frame_length) => frame,
            };

            let frame = match frame {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::info!("Client {} disconnected.", peer);
                    return;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "closing connection after unreadable frame");
                    return;
                }
            };

            let request = match Request::decode(&frame) {
                Ok(request) => request,
                Err(err) => {
                    tracing::warn!(error = %err, "closing connection after malformed request");
                    return;
                }
            };

            tracing::trace!(
                message_id = request.message_id,
                service = %request.service_name,
                method = %request.method_name,
                "received request"
            );

            let response = self.endpoint.invoke(request).await;

            if let Err(err) = stream.write_all(&response.encode()).await {
                tracing::warn!(error = %err, "failed to write response");
                return;
            }
        }

        tracing::info!("Closing connection to {} on shutdown.", peer);
    }
}
