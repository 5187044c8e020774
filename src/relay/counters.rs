use std::time::Duration;

/// Monotonic count of relayed correction bytes plus the per-second delta
/// used for diagnostics.
#[derive(Debug, Default)]
pub struct ThroughputCounter {
    total: u64,
    last_total: u64,
}

impl ThroughputCounter {
    /// Creates a zeroed counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Records newly relayed bytes
    pub fn record(&mut self, count: usize) {
        self.total += count as u64;
    }

    /// Total bytes relayed since construction
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Bytes relayed since the previous boundary; advances the boundary
    pub fn take_delta(&mut self) -> u64 {
        let delta = self.total - self.last_total;
        self.last_total = self.total;
        delta
    }
}

/// Counts consecutive one-second ticks with zero newly relayed bytes.
///
/// Any relayed byte resets the count; expiry requires the count to strictly
/// exceed the configured timeout.
#[derive(Debug)]
pub struct WatchdogTimer {
    timeout_secs: u64,
    stale_secs: u64,
}

impl WatchdogTimer {
    /// Creates a watchdog with the given timeout
    pub fn new(timeout: Duration) -> Self {
        WatchdogTimer {
            timeout_secs: timeout.as_secs(),
            stale_secs: 0,
        }
    }

    /// Advances one second boundary, given the bytes relayed within it.
    /// Returns true when the watchdog has expired.
    pub fn tick(&mut self, relayed: u64) -> bool {
        if relayed > 0 {
            self.stale_secs = 0;
            return false;
        }
        self.stale_secs += 1;
        self.stale_secs > self.timeout_secs
    }

    /// Consecutive stale seconds observed so far
    pub fn stale_secs(&self) -> u64 {
        self.stale_secs
    }
}
