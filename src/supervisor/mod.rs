//! Lifecycle orchestration and restart policy
//!
//! The supervisor drives one full attempt (resolve, connect, handshake,
//! position report, relay) and answers any failure by closing the session,
//! waiting a fixed cooldown, and rebuilding everything from scratch. The set
//! of recoverable states (stuck sockets, half-open connections, stale DNS)
//! is hard to enumerate, so nothing is patched up in place.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

use crate::core::{
    Config, Error, Result, CONNECT_TIMEOUT_SECS, HEADER_TIMEOUT_SECS, RESTART_COOLDOWN_SECS,
};
use crate::position;
use crate::relay::{RelayLoop, SerialSink, StatusIndicator};
use crate::session::CasterSession;

/// What to do once a failed attempt's cooldown has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Loop back to resolution in-process with all state rebuilt
    InProcess,
    /// Return the terminal error so the process can exit with a
    /// restart-requested status for an external supervisor
    ExitProcess,
}

/// Top-level driver owning the serial sink and the retry policy
pub struct Supervisor<W, I> {
    config: Config,
    sink: W,
    indicator: I,
    policy: RestartPolicy,
    cooldown: Duration,
}

impl<W, I> Supervisor<W, I>
where
    W: SerialSink,
    I: StatusIndicator,
{
    /// Creates a supervisor with the default failure cooldown
    pub fn new(config: Config, sink: W, indicator: I, policy: RestartPolicy) -> Self {
        Supervisor {
            config,
            sink,
            indicator,
            policy,
            cooldown: Duration::from_secs(RESTART_COOLDOWN_SECS),
        }
    }

    /// Overrides the failure cooldown
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Runs attempts until cancelled, which is the one clean exit. Under
    /// [`RestartPolicy::ExitProcess`] the first terminal failure is returned
    /// after its cooldown instead of retrying in-process.
    pub async fn run(&mut self, cancel: &CancellationToken) -> Result<()> {
        loop {
            if cancel.is_cancelled() {
                tracing::info!("cancelled, shutting down");
                return Ok(());
            }

            let err = self.run_attempt(cancel).await;
            if err.is_cancelled() {
                tracing::info!("cancelled, shutting down");
                return Ok(());
            }

            tracing::error!(error = %err, "session failed, restart in {:?}", self.cooldown);
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(self.cooldown) => {}
            }

            if self.policy == RestartPolicy::ExitProcess {
                return Err(err);
            }
        }
    }

    /// Drives one full lifecycle attempt and returns its terminal condition
    async fn run_attempt(&mut self, cancel: &CancellationToken) -> Error {
        let addr =
            match resolve_caster(&self.config.caster_host, self.config.caster_port).await {
                Ok(addr) => addr,
                Err(e) => return e,
            };

        tracing::info!(%addr, mount = %self.config.mount_point, "connecting to caster");
        let mut session =
            match CasterSession::connect(addr, Duration::from_secs(CONNECT_TIMEOUT_SECS)).await {
                Ok(session) => session,
                Err(e) => return e,
            };

        let err = self.run_streaming(&mut session, cancel).await;
        session.close().await;
        err
    }

    /// Handshake, the one position report, and the relay against an open
    /// session
    async fn run_streaming(
        &mut self,
        session: &mut CasterSession,
        cancel: &CancellationToken,
    ) -> Error {
        if let Err(e) = session.send_handshake(&self.config).await {
            return e;
        }
        if let Err(e) = session
            .receive_headers(Duration::from_secs(HEADER_TIMEOUT_SECS))
            .await
        {
            return e;
        }

        let report = position::gga_sentence(
            self.config.latitude,
            self.config.longitude,
            self.config.altitude,
            Utc::now().time(),
        );
        if let Err(e) = session.send_position(&report).await {
            return e;
        }
        tracing::info!(mount = %self.config.mount_point, "handshake complete, streaming");

        let mut relay = RelayLoop::new(self.config.watchdog_timeout);
        let err = relay
            .run(session, &mut self.sink, &mut self.indicator, cancel)
            .await;
        tracing::info!(total_bytes = relay.total_bytes(), "streaming ended");
        err
    }
}

/// Resolves the caster hostname to a concrete transport address.
///
/// Runs once per attempt; after a restart the fresh attempt re-resolves from
/// scratch, so stale answers never outlive a session.
pub async fn resolve_caster(host: &str, port: u16) -> Result<SocketAddr> {
    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        .map_err(|e| Error::resolution(e.to_string()))?;

    let lookup = resolver
        .lookup_ip(host)
        .await
        .map_err(|e| Error::resolution(format!("{}: {}", host, e)))?;

    let ip = lookup
        .iter()
        .next()
        .ok_or_else(|| Error::resolution(format!("no addresses for {}", host)))?;

    Ok(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::NoopIndicator;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct VecSink {
        data: Vec<u8>,
    }

    impl SerialSink for VecSink {
        fn write_bytes(&mut self, data: &[u8]) -> Result<usize> {
            self.data.extend_from_slice(data);
            Ok(data.len())
        }
    }

    fn local_config(addr: SocketAddr) -> Config {
        Config {
            caster_host: addr.ip().to_string(),
            caster_port: addr.port(),
            mount_point: "MOUNT1".to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
            watchdog_timeout: Duration::from_secs(1),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_cancelled_before_start_is_clean() {
        let config = Config::default();
        let mut supervisor = Supervisor::new(
            config,
            VecSink::default(),
            NoopIndicator,
            RestartPolicy::InProcess,
        );

        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(supervisor.run(&cancel).await.is_ok());
    }

    #[tokio::test]
    async fn test_sourcetable_classified_and_returned() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"SOURCETABLE 200 OK\r\n\r\n")
                .await
                .unwrap();
        });

        let mut supervisor = Supervisor::new(
            local_config(addr),
            VecSink::default(),
            NoopIndicator,
            RestartPolicy::ExitProcess,
        )
        .with_cooldown(Duration::from_millis(0));

        let cancel = CancellationToken::new();
        let result = supervisor.run(&cancel).await;
        assert!(matches!(result, Err(Error::MountPointNotFound)));
    }

    #[tokio::test]
    async fn test_streaming_bytes_reach_sink() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            // Read the whole handshake request up to its blank line
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(b"ICY 200 OK\r\n\r\n").await.unwrap();
            // Position report
            let n = socket.read(&mut buf).await.unwrap();
            assert!(buf[..n].starts_with(b"$GPGGA,"));
            socket.write_all(b"correction-stream").await.unwrap();
            // Closing the socket terminates the relay with a transport error
        });

        let mut supervisor = Supervisor::new(
            local_config(addr),
            VecSink::default(),
            NoopIndicator,
            RestartPolicy::ExitProcess,
        )
        .with_cooldown(Duration::from_millis(0));

        let cancel = CancellationToken::new();
        let result = supervisor.run(&cancel).await;
        assert!(matches!(result, Err(Error::RelayTransport(_))));
        assert_eq!(supervisor.sink.data, b"correction-stream");
    }

    #[tokio::test]
    #[ignore] // Requires working DNS
    async fn test_resolution_failure() {
        let result = resolve_caster("does-not-exist.invalid", 2101).await;
        assert!(matches!(result, Err(Error::AddressResolution(_))));
    }

    #[tokio::test]
    async fn test_resolve_ip_literal() {
        let addr = resolve_caster("127.0.0.1", 2101).await.unwrap();
        assert_eq!(addr, "127.0.0.1:2101".parse().unwrap());
    }
}
