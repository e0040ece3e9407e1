//! The world clock: wall-clock time in, action points out.

use std::time::{Duration, Instant};

use veld_core::ApConverter;

/// Tracks server start, the previous pulse, and cumulative action-point
/// emission.
///
/// Each pulse asks [`elapsed_ap`](WorldClock::elapsed_ap) how many
/// whole action points have accrued since the previous pulse; the
/// sub-point remainder is carried inside the converter, so irregular
/// pulse spacing (a slow I/O loop, a long stall) never loses or
/// duplicates simulated time.
#[derive(Clone, Debug)]
pub struct WorldClock {
    started: Instant,
    last_pulse: Instant,
    converter: ApConverter,
}

impl WorldClock {
    /// Start the clock at `now`, emitting one point per `ms_per_ap`
    /// milliseconds.
    pub fn new(ms_per_ap: u64, now: Instant) -> Self {
        Self {
            started: now,
            last_pulse: now,
            converter: ApConverter::new(ms_per_ap),
        }
    }

    /// Action points accrued since the previous call (or since start,
    /// for the first call).
    pub fn elapsed_ap(&mut self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.last_pulse);
        self.last_pulse = now;
        self.converter.advance(elapsed)
    }

    /// Total action points emitted since start. Diagnostics only.
    pub fn used_ap(&self) -> u64 {
        self.converter.total_emitted()
    }

    /// Wall-clock time since the clock started.
    pub fn uptime(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }
}
