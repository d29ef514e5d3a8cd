// SPDX-License-Identifier: MIT

//! Clock abstraction for testable time handling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A clock that provides the current time. Implementations must be cheap
/// to clone (the same handle is threaded through every lead queue and the
/// orchestrator).
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    fn epoch_ms(&self) -> u64;
}

/// Real system clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Fake clock for deterministic tests: epoch_ms is an atomic counter,
/// advanced explicitly rather than tied to wall time.
#[derive(Clone)]
pub struct FakeClock {
    start: Instant,
    offset_ms: Arc<AtomicU64>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset_ms: Arc::new(AtomicU64::new(1_000_000)),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.offset_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_epoch_ms(&self, ms: u64) {
        self.offset_ms.store(ms, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.start + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }

    fn epoch_ms(&self) -> u64 {
        self.offset_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_clock_advances_monotonically() {
        let clock = FakeClock::new();
        let t0 = clock.epoch_ms();
        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.epoch_ms(), t0 + 500);
    }

    #[test]
    fn fake_clock_instant_tracks_epoch() {
        let clock = FakeClock::new();
        let i0 = clock.now();
        clock.advance(Duration::from_secs(1));
        assert!(clock.now() > i0);
    }
}
