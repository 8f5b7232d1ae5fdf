//! Microsecond clock contract.
//!
//! Valves measure motion and interlock timeouts by polling elapsed time
//! against a threshold; they never arm an asynchronous alarm. The clock
//! must be monotonic and non-decreasing with at least 1 µs resolution.

use std::sync::atomic::{AtomicU64, Ordering};

use nix::time::{ClockId, clock_gettime};
use static_assertions::assert_impl_all;

/// Source of monotonic microsecond timestamps.
pub trait Clock: Send + Sync {
    /// Current time in microseconds. Never decreases.
    fn now_us(&self) -> u64;
}

// ─── MonotonicClock ─────────────────────────────────────────────────

/// `CLOCK_MONOTONIC` in microseconds.
///
/// The returned value is clamped to the last observed reading, so a
/// failing `clock_gettime` yields a stalled (not rewinding) clock.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last_us: AtomicU64,
}

impl MonotonicClock {
    /// Create a clock with no reading taken yet.
    pub const fn new() -> Self {
        Self {
            last_us: AtomicU64::new(0),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_us(&self) -> u64 {
        match clock_gettime(ClockId::CLOCK_MONOTONIC) {
            Ok(ts) => {
                let us = (ts.tv_sec() as u64)
                    .saturating_mul(1_000_000)
                    .saturating_add(ts.tv_nsec() as u64 / 1_000);
                let prev = self.last_us.fetch_max(us, Ordering::AcqRel);
                prev.max(us)
            }
            Err(e) => {
                tracing::warn!("clock_gettime(CLOCK_MONOTONIC) failed: {e}");
                self.last_us.load(Ordering::Acquire)
            }
        }
    }
}

// ─── ManualClock ────────────────────────────────────────────────────

/// Explicitly advanced clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_us: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading `start_us`.
    pub const fn new(start_us: u64) -> Self {
        Self {
            now_us: AtomicU64::new(start_us),
        }
    }

    /// Move the clock forward by `delta_us`. Saturates at `u64::MAX`.
    pub fn advance(&self, delta_us: u64) {
        // The closure always returns `Some`, so the update cannot fail.
        let _ = self
            .now_us
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                Some(now.saturating_add(delta_us))
            });
    }

    /// Move the clock forward by `delta_ms` milliseconds.
    pub fn advance_ms(&self, delta_ms: u64) {
        self.advance(delta_ms.saturating_mul(1_000));
    }

    /// Set an absolute time. Values earlier than the current reading are
    /// ignored to keep the clock non-decreasing.
    pub fn set(&self, now_us: u64) {
        self.now_us.fetch_max(now_us, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_us(&self) -> u64 {
        self.now_us.load(Ordering::Acquire)
    }
}

assert_impl_all!(MonotonicClock: Clock, Send, Sync);
assert_impl_all!(ManualClock: Clock, Send, Sync);
