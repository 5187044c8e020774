//! NTRIP correction relay: a streaming client for RTCM differential data.
//!
//! This library connects to an NTRIP caster, authenticates against a mount
//! point, reports a fixed receiver position, and relays the resulting binary
//! correction stream to a serial-attached GNSS receiver. A supervisor applies
//! a fail-fast restart policy around the whole lifecycle.
#![allow(warnings)]
pub mod core;

pub mod position;
pub mod relay;
pub mod serial;
pub mod session;
pub mod supervisor;

// Re-export commonly used items
pub use crate::core::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
