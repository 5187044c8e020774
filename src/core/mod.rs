//! Core types and constants for the NTRIP relay
//!
//! This module contains the fundamental building blocks used throughout the library.

pub mod error;
pub mod serde;
pub mod types;

pub use self::error::{Error, Result};
pub use self::types::Config;

/// Default NTRIP caster port
pub const DEFAULT_CASTER_PORT: u16 = 2101;

/// Maximum size of the handshake response read in one bounded receive
pub const HEADER_BUFFER_SIZE: usize = 4096;

/// Read chunk size for the steady-state correction stream
pub const READ_CHUNK_SIZE: usize = 2048;

/// Timeout applied to the TCP connect attempt
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Timeout applied to the handshake response read
pub const HEADER_TIMEOUT_SECS: u64 = 10;

/// Default bound on a single inbound poll during streaming
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 100;

/// Delay between a terminal failure and the restart of the next attempt
pub const RESTART_COOLDOWN_SECS: u64 = 10;
