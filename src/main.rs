//! NTRIP relay binary: static operating parameters, logging setup, and
//! lifecycle wiring.

use std::process::ExitCode;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use ntrip_relay::core::Config;
use ntrip_relay::relay::NoopIndicator;
use ntrip_relay::serial::UartSink;
use ntrip_relay::supervisor::{RestartPolicy, Supervisor};

/// Exit status asking an outer process supervisor for a full restart
const RESTART_EXIT_CODE: u8 = 10;

/// Operating parameters
fn operating_config() -> Config {
    Config {
        caster_host: "rtk2go.com".to_string(),
        caster_port: 2101,
        mount_point: "JoeSeelsGPS".to_string(),
        username: "rtk2go@fishbeetle.co.uk".to_string(),
        password: "none".to_string(),
        latitude: 53.0,
        longitude: -1.0,
        altitude: 252.0,
        watchdog_timeout: Duration::from_secs(30),
        serial_device: "/dev/ttyUSB0".to_string(),
        serial_baud: 115_200,
        ..Config::default()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let config = operating_config();
    let sink = match UartSink::open(&config) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!(error = %e, device = %config.serial_device, "failed to open serial device");
            return ExitCode::from(RESTART_EXIT_CODE);
        }
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            interrupt.cancel();
        }
    });

    let mut supervisor = Supervisor::new(config, sink, NoopIndicator, RestartPolicy::InProcess);
    match supervisor.run(&cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "terminal failure, requesting restart");
            ExitCode::from(RESTART_EXIT_CODE)
        }
    }
}
