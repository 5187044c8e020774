use std::io;
use std::time::Duration;
use thiserror::Error;

/// Failure taxonomy for the NTRIP relay.
///
/// One variant per failure surface: "caster unreachable", "mount point
/// wrong", "credentials rejected", and "stream went silent" stay
/// distinguishable all the way up to the supervisor.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("address resolution failed: {0}")]
    AddressResolution(String),

    #[error("connect to caster failed: {0}")]
    Connect(String),

    #[error("handshake send failed: {0}")]
    HandshakeSend(String),

    #[error("header receive failed: {0}")]
    HeaderReceive(String),

    #[error("header receive timed out after {0:?}")]
    HeaderReceiveTimedOut(Duration),

    #[error("mount point not found: caster answered with a sourcetable")]
    MountPointNotFound,

    #[error("handshake rejected by caster: {0}")]
    HandshakeRejected(String),

    #[error("position report send failed: {0}")]
    PositionSend(String),

    #[error("relay transport failed: {0}")]
    RelayTransport(String),

    #[error("serial sink accepted {written} of {expected} bytes")]
    SerialWriteShort { written: usize, expected: usize },

    #[error("watchdog expired after {stale_secs}s without inbound data")]
    WatchdogExpired { stale_secs: u64 },

    #[error("cancelled by user")]
    Cancelled,
}

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new address resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Error::AddressResolution(msg.into())
    }

    /// Creates a new connect error
    pub fn connect(msg: impl Into<String>) -> Self {
        Error::Connect(msg.into())
    }

    /// Creates a new handshake send error
    pub fn handshake_send(msg: impl Into<String>) -> Self {
        Error::HandshakeSend(msg.into())
    }

    /// Creates a new header receive error
    pub fn header_receive(msg: impl Into<String>) -> Self {
        Error::HeaderReceive(msg.into())
    }

    /// Creates a new handshake rejection error
    pub fn rejected(msg: impl Into<String>) -> Self {
        Error::HandshakeRejected(msg.into())
    }

    /// Creates a new position send error
    pub fn position_send(msg: impl Into<String>) -> Self {
        Error::PositionSend(msg.into())
    }

    /// Creates a new relay transport error
    pub fn relay_transport(msg: impl Into<String>) -> Self {
        Error::RelayTransport(msg.into())
    }

    /// Returns true for the one clean-exit condition: a user-initiated
    /// cancellation. Every other variant is answered with a restart.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
