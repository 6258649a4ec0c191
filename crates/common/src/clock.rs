//! Clock and timing utilities for frame timestamps.
//!
//! Every frame carries a monotonic timestamp in nanoseconds relative to
//! the epoch captured when tracking started. Configured intervals are
//! expressed in seconds and converted with [`secs_to_ns`].

use std::time::Instant;

/// A monotonic clock anchored to the moment tracking started.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// The instant tracking started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl FrameClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Timestamp for a frame captured now.
    pub fn now_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Wall-clock time at epoch.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Convert a nanosecond value to seconds.
pub fn ns_to_secs(ns: u64) -> f64 {
    ns as f64 / 1_000_000_000.0
}

/// Convert seconds to nanoseconds. Negative input saturates to zero.
pub fn secs_to_ns(secs: f64) -> u64 {
    (secs.max(0.0) * 1_000_000_000.0).round() as u64
}

/// Nanoseconds from `earlier` to `later`; zero if the clock went backwards.
pub fn elapsed_ns(earlier: u64, later: u64) -> u64 {
    later.saturating_sub(earlier)
}
