//! Serial transport to the downstream GNSS receiver

use std::io::Write;
use std::time::Duration;

use serialport::SerialPort;

use crate::core::{Config, Error, Result};
use crate::relay::SerialSink;

/// Write timeout for the UART; a full read chunk drains well inside this at
/// the supported baud rates.
const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

/// Serial port sink feeding the receiver's correction input
pub struct UartSink {
    port: Box<dyn SerialPort>,
}

impl UartSink {
    /// Opens the configured serial device
    pub fn open(config: &Config) -> Result<Self> {
        let port = serialport::new(config.serial_device.as_str(), config.serial_baud)
            .timeout(WRITE_TIMEOUT)
            .open()
            .map_err(|e| Error::Io(e.into()))?;

        Ok(UartSink { port })
    }
}

impl SerialSink for UartSink {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize> {
        let written = self.port.write(data)?;
        Ok(written)
    }
}
