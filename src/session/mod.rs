//! Caster session management
//!
//! One session owns one live TCP connection to the caster and walks it
//! through connect, handshake, header validation, and streaming. Every
//! failure surface maps to its own [`Error`] variant so the supervisor can
//! classify what went wrong without inspecting strings.

pub mod handshake;

use std::net::SocketAddr;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::core::{Config, Error, Result, HEADER_BUFFER_SIZE};
use crate::relay::CorrectionSource;

/// Lifecycle states of a caster session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport connection established, handshake not yet sent
    Connecting,
    /// Handshake sent, waiting for the caster's response headers
    AwaitingHeaders,
    /// Handshake validated, correction bytes flowing
    Streaming,
    /// Connection shut down
    Closed,
}

/// One live connection to an NTRIP caster.
///
/// At most one session is open at a time; it is owned exclusively by the
/// running loop and dropped on any terminal error or clean shutdown.
pub struct CasterSession {
    stream: TcpStream,
    state: SessionState,
}

impl CasterSession {
    /// Opens the transport connection to the caster.
    ///
    /// No retries happen here; the retry policy lives in the supervisor.
    pub async fn connect(addr: SocketAddr, connect_timeout: Duration) -> Result<Self> {
        let stream = timeout(connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| Error::connect(format!("timed out connecting to {}", addr)))?
            .map_err(|e| Error::connect(format!("{}: {}", addr, e)))?;

        Ok(CasterSession {
            stream,
            state: SessionState::Connecting,
        })
    }

    /// Returns the current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Sends the HTTP-subset handshake request for the configured mount point
    pub async fn send_handshake(&mut self, config: &Config) -> Result<()> {
        let request = handshake::build_request(config);
        tracing::debug!(mount = %config.mount_point, "sending handshake request");

        self.stream
            .write_all(request.as_bytes())
            .await
            .map_err(|e| Error::handshake_send(e.to_string()))?;

        self.state = SessionState::AwaitingHeaders;
        Ok(())
    }

    /// Reads the caster's response headers and validates the handshake.
    ///
    /// The whole response is taken in one bounded read; casters answer a
    /// mount-point request with a single small header block.
    pub async fn receive_headers(&mut self, read_timeout: Duration) -> Result<()> {
        let mut buf = BytesMut::zeroed(HEADER_BUFFER_SIZE);

        let received = match timeout(read_timeout, self.stream.read(&mut buf)).await {
            Err(_) => return Err(Error::HeaderReceiveTimedOut(read_timeout)),
            Ok(Err(e)) => return Err(Error::header_receive(e.to_string())),
            Ok(Ok(0)) => return Err(Error::header_receive("connection closed before headers")),
            Ok(Ok(n)) => n,
        };

        handshake::validate_response(&buf[..received])?;
        self.state = SessionState::Streaming;
        Ok(())
    }

    /// Transmits the checksummed position report
    pub async fn send_position(&mut self, report: &[u8]) -> Result<()> {
        self.stream
            .write_all(report)
            .await
            .map_err(|e| Error::position_send(e.to_string()))
    }

    /// Polls for inbound correction bytes with a short bound.
    ///
    /// An elapsed timeout with nothing received is the normal "nothing yet"
    /// outcome and returns zero; a closed or faulted connection is a relay
    /// transport failure.
    pub async fn poll_inbound(&mut self, buf: &mut [u8], poll_timeout: Duration) -> Result<usize> {
        match timeout(poll_timeout, self.stream.read(buf)).await {
            Err(_) => Ok(0),
            Ok(Ok(0)) => Err(Error::relay_transport("connection closed by caster")),
            Ok(Ok(received)) => Ok(received),
            Ok(Err(e)) => Err(Error::relay_transport(e.to_string())),
        }
    }

    /// Best-effort shutdown.
    ///
    /// Closing an already-broken connection is expected and harmless, so
    /// errors are swallowed; repeated calls are no-ops.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        let _ = self.stream.shutdown().await;
        self.state = SessionState::Closed;
    }
}

impl CorrectionSource for CasterSession {
    async fn poll(&mut self, buf: &mut [u8], poll_timeout: Duration) -> Result<usize> {
        self.poll_inbound(buf, poll_timeout).await
    }
}
