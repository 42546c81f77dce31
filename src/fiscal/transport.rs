//! Byte transport over the serial-to-TCP bridge.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, error, info};

use super::packet::{BCC_LEN, ETX, STX};
use crate::config::ConnectionConfig;

/// Exchanges one framed request for one framed response. Implementations
/// return raw frame bytes; framing validation belongs to the packet layer.
#[async_trait]
pub trait Transport: Send {
    async fn execute(&mut self, frame: &[u8]) -> std::io::Result<Vec<u8>>;
}

/// TCP transport to a serial bridge (typically port 9100).
pub struct TcpTransport {
    stream: Option<TcpStream>,
    host: String,
    port: u16,
    timeout_duration: Duration,
}

impl TcpTransport {
    pub fn new(config: &ConnectionConfig) -> Self {
        Self {
            stream: None,
            host: config.host.clone(),
            port: config.port,
            timeout_duration: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Connect to the bridge.
    pub async fn connect(&mut self) -> std::io::Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        info!("Connecting to {} (timeout={:?})", addr, self.timeout_duration);

        let stream = timeout(self.timeout_duration, TcpStream::connect(&addr))
            .await
            .map_err(|_| {
                error!("Connection timeout to {addr}");
                std::io::Error::new(std::io::ErrorKind::TimedOut, format!("connection timeout to {addr}"))
            })?
            .map_err(|e| {
                error!("Failed to connect to {addr}: {e}");
                e
            })?;

        self.stream = Some(stream);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub fn disconnect(&mut self) {
        self.stream = None;
    }

    /// Read one frame: skip noise before STX, collect through ETX, then the
    /// four checksum bytes.
    async fn read_frame(stream: &mut TcpStream, deadline: Duration) -> std::io::Result<Vec<u8>> {
        let mut frame = Vec::with_capacity(64);
        let mut byte = [0u8; 1];

        loop {
            let n = timeout(deadline, stream.read(&mut byte))
                .await
                .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "response timeout"))??;
            if n == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed mid-response",
                ));
            }

            if frame.is_empty() {
                // Inter-frame noise before STX is discarded.
                if byte[0] != STX {
                    continue;
                }
                frame.push(STX);
                continue;
            }

            frame.push(byte[0]);
            if byte[0] == ETX {
                break;
            }
        }

        let mut bcc = [0u8; BCC_LEN];
        timeout(deadline, stream.read_exact(&mut bcc))
            .await
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "checksum timeout"))??;
        frame.extend_from_slice(&bcc);

        Ok(frame)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn execute(&mut self, frame: &[u8]) -> std::io::Result<Vec<u8>> {
        let deadline = self.timeout_duration;
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotConnected, "not connected"))?;

        debug!("TX {} bytes", frame.len());
        timeout(deadline, stream.write_all(frame))
            .await
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "write timeout"))??;
        timeout(deadline, stream.flush())
            .await
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "flush timeout"))??;

        let response = Self::read_frame(stream, deadline).await?;
        debug!("RX {} bytes", response.len());
        Ok(response)
    }
}
