use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::core::{Config, Error, Result};

/// Encodes the colon-joined credential pair for Basic authentication
pub fn basic_credentials(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{}:{}", username, password))
}

/// Builds the HTTP-subset GET request block for the configured mount point.
///
/// NTRIP v2 implies the Host header even when it is not separately enabled.
pub fn build_request(config: &Config) -> String {
    let mut request = format!("GET /{} HTTP/1.1\r\n", config.mount_point);
    request.push_str(&format!("User-Agent: {}\r\n", config.user_agent));
    request.push_str(&format!(
        "Authorization: Basic {}\r\n",
        basic_credentials(&config.username, &config.password)
    ));
    if config.send_host_header || config.ntrip_v2 {
        request.push_str(&format!(
            "Host: {}:{}\r\n",
            config.caster_host, config.caster_port
        ));
    }
    if config.ntrip_v2 {
        request.push_str("Ntrip-Version: Ntrip/2.0\r\n");
    }
    request.push_str("\r\n");
    request
}

/// Scans a handshake response block for the caster's verdict.
///
/// Lines are examined up to the first blank line or the end of the buffer; a
/// line that does not decode ends the scan. A sourcetable answer means the
/// mount point does not exist and wins over any status line; otherwise some
/// line has to end in ` 200 OK`.
pub fn validate_response(buf: &[u8]) -> Result<()> {
    let mut header_ok = false;

    for raw in buf.split(|&b| b == b'\n') {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line.trim(),
            Err(_) => break,
        };
        if line.is_empty() {
            break;
        }
        let upper = line.to_uppercase();
        if upper.starts_with("SOURCETABLE") {
            return Err(Error::MountPointNotFound);
        }
        header_ok |= upper.ends_with(" 200 OK");
    }

    if header_ok {
        Ok(())
    } else {
        Err(Error::rejected("no 200 OK line in caster response"))
    }
}
