use crate::ConnectionFactory;
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;

pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(3);

/// Dials TCP connections to one address, giving up after `dial_timeout`.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    addr: String,
    dial_timeout: Duration,
}

impl TcpConnector {
    pub fn new(addr: impl Into<String>) -> Self {
        TcpConnector {
            addr: addr.into(),
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
        }
    }

    pub fn with_dial_timeout(mut self, dial_timeout: Duration) -> Self {
        self.dial_timeout = dial_timeout;
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait::async_trait]
impl ConnectionFactory for TcpConnector {
    type Connection = TcpStream;

    async fn connect(&self) -> io::Result<TcpStream> {
        let stream = tokio::time::timeout(self.dial_timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("dialing {} timed out after {:?}", self.addr, self.dial_timeout),
                )
            })??;

        stream.set_nodelay(true)?;

        tracing::debug!(addr = %self.addr, "dialed connection");

        Ok(stream)
    }
}
