//! Time sources for packet timestamping.
//!
//! The Local Data Set timestamp is microseconds since the Unix epoch.
//! The encoder depends only on the [`Clock`] trait so the production
//! wall clock can be swapped for a settable clock in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of Unix-epoch timestamps.
///
/// Implementations should be non-decreasing under normal operation. The
/// wall clock is subject to system adjustments; a pre-epoch reading
/// clamps to 0 rather than wrapping.
pub trait Clock: Send + Sync {
    /// Current time as microseconds since 1970-01-01T00:00:00Z.
    fn now_micros(&self) -> u64;

    /// Human-readable name for the clock.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// System wall clock.
#[derive(Debug, Default)]
pub struct WallClock;

impl WallClock {
    /// Create a new wall clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for WallClock {
    fn now_micros(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0)
    }

    fn name(&self) -> &str {
        "wall-clock"
    }
}

/// Settable clock for tests.
///
/// Returns whatever was last stored with [`ManualClock::set_micros`].
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: AtomicU64,
}

impl ManualClock {
    /// Create a manual clock starting at the given timestamp.
    pub fn new(micros: u64) -> Self {
        Self {
            micros: AtomicU64::new(micros),
        }
    }

    /// Set the timestamp returned by subsequent `now_micros` calls.
    pub fn set_micros(&self, micros: u64) {
        self.micros.store(micros, Ordering::Release);
    }

    /// Advance the clock by the given number of microseconds.
    pub fn advance_micros(&self, delta: u64) {
        self.micros.fetch_add(delta, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_micros(&self) -> u64 {
        self.micros.load(Ordering::Acquire)
    }

    fn name(&self) -> &str {
        "manual"
    }
}
