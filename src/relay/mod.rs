//! Steady-state relay of correction bytes to the serial sink
//!
//! The relay loop is the sole activity while a session is streaming: it
//! polls the caster with a short bound, forwards whatever arrives to the
//! serial sink verbatim and in order, and once per wall-clock second runs
//! the throughput and watchdog bookkeeping. The short poll bound keeps the
//! bookkeeping on cadence even against a silent peer.

pub mod counters;

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use self::counters::{ThroughputCounter, WatchdogTimer};
use crate::core::{Error, Result, DEFAULT_POLL_TIMEOUT_MS, READ_CHUNK_SIZE};

/// Source of inbound correction bytes.
///
/// Implemented by the caster session; tests script arbitrary streams.
pub trait CorrectionSource {
    /// Polls for inbound bytes with a short bound; zero means "nothing yet"
    async fn poll(&mut self, buf: &mut [u8], poll_timeout: Duration) -> Result<usize>;
}

/// Downstream byte sink.
///
/// The contract is "accepts a byte sequence and reports the count actually
/// written"; the relay treats anything less than the full chunk as fatal,
/// since a partial frame corrupts the downstream decoder.
pub trait SerialSink {
    /// Writes a chunk, returning how many bytes the sink accepted
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize>;
}

/// Optional once-per-iteration status side effect (an LED, a UI tick).
///
/// Purely a notification sink with no bearing on correctness.
pub trait StatusIndicator {
    /// Called once per relay iteration
    fn pulse(&mut self);
}

/// Indicator that does nothing
#[derive(Debug, Default)]
pub struct NoopIndicator;

impl StatusIndicator for NoopIndicator {
    fn pulse(&mut self) {}
}

/// The steady-state relay loop with its bookkeeping state.
///
/// Counters are fields here rather than ambient globals so tests can build
/// independent instances.
pub struct RelayLoop {
    poll_timeout: Duration,
    throughput: ThroughputCounter,
    watchdog: WatchdogTimer,
}

impl RelayLoop {
    /// Creates a relay loop with the given watchdog timeout and the default
    /// poll bound
    pub fn new(watchdog_timeout: Duration) -> Self {
        Self::with_poll_timeout(
            watchdog_timeout,
            Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS),
        )
    }

    /// Creates a relay loop with an explicit poll bound
    pub fn with_poll_timeout(watchdog_timeout: Duration, poll_timeout: Duration) -> Self {
        RelayLoop {
            poll_timeout,
            throughput: ThroughputCounter::new(),
            watchdog: WatchdogTimer::new(watchdog_timeout),
        }
    }

    /// Total bytes relayed so far
    pub fn total_bytes(&self) -> u64 {
        self.throughput.total()
    }

    /// Runs until a terminal condition and returns it.
    ///
    /// Cancellation is observed at the top of every iteration. No iteration
    /// blocks longer than the poll bound.
    pub async fn run<S, W, I>(
        &mut self,
        source: &mut S,
        sink: &mut W,
        indicator: &mut I,
        cancel: &CancellationToken,
    ) -> Error
    where
        S: CorrectionSource,
        W: SerialSink,
        I: StatusIndicator,
    {
        let mut buf = [0u8; READ_CHUNK_SIZE];
        let mut boundary = Instant::now() + Duration::from_secs(1);

        loop {
            if cancel.is_cancelled() {
                return Error::Cancelled;
            }

            match source.poll(&mut buf, self.poll_timeout).await {
                Ok(0) => {}
                Ok(received) => {
                    match sink.write_bytes(&buf[..received]) {
                        Ok(written) if written == received => {}
                        Ok(written) => {
                            return Error::SerialWriteShort {
                                written,
                                expected: received,
                            };
                        }
                        Err(e) => return e,
                    }
                    self.throughput.record(received);
                }
                Err(e) => return e,
            }

            indicator.pulse();

            if Instant::now() >= boundary {
                boundary += Duration::from_secs(1);
                let delta = self.throughput.take_delta();
                if delta > 0 {
                    tracing::debug!(delta, total = self.throughput.total(), "relayed");
                }
                if self.watchdog.tick(delta) {
                    return Error::WatchdogExpired {
                        stale_secs: self.watchdog.stale_secs(),
                    };
                }
            }
        }
    }
}
