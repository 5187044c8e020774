use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Operating parameters for one relay process.
///
/// Built once at startup and never mutated; every component borrows it
/// read-only. Loading from disk is out of scope here, the binary assembles it
/// from static settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Caster hostname
    pub caster_host: String,
    /// Caster TCP port
    pub caster_port: u16,
    /// Mount point to request from the caster
    pub mount_point: String,
    /// Basic-auth user name
    pub username: String,
    /// Basic-auth password
    pub password: String,
    /// User-Agent header value sent in the handshake
    pub user_agent: String,
    /// Fixed receiver latitude in signed degrees
    pub latitude: f64,
    /// Fixed receiver longitude in signed degrees
    pub longitude: f64,
    /// Fixed receiver altitude in metres
    pub altitude: f64,
    /// Include a Host header in the handshake request
    pub send_host_header: bool,
    /// Speak NTRIP v2 (implies the Host header and an Ntrip-Version header)
    pub ntrip_v2: bool,
    /// Seconds of silence on the correction stream before the watchdog fires
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub watchdog_timeout: Duration,
    /// Serial device the corrections are written to
    pub serial_device: String,
    /// Serial baud rate
    pub serial_baud: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            caster_host: "rtk2go.com".to_string(),
            caster_port: super::DEFAULT_CASTER_PORT,
            mount_point: String::new(),
            username: String::new(),
            password: "none".to_string(),
            user_agent: format!("NTRIP ntrip_relay/{}", crate::VERSION),
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            send_host_header: false,
            ntrip_v2: false,
            watchdog_timeout: Duration::from_secs(30),
            serial_device: "/dev/ttyUSB0".to_string(),
            serial_baud: 115_200,
        }
    }
}
