//! Elapsed-time to action-point conversion and interval timers.
//!
//! [`ApConverter`] is the pure arithmetic heart of the world clock: it
//! turns arbitrarily-partitioned elapsed wall-clock durations into a
//! stream of whole action points, carrying the sub-point remainder
//! forward so no simulated time is ever lost or double-counted.
//! [`IntervalTimer`] is the simple "has a minute passed yet" check used
//! for periodic duties like spawn replenishment and player saves.

use std::time::{Duration, Instant};

/// Converts elapsed wall-clock time into whole action points.
///
/// Each [`advance`](ApConverter::advance) call emits
/// `floor((elapsed + carry) / period)` points and retains the
/// remainder. The invariant across any sequence of calls is
///
/// `total_emitted * period + carry == total_elapsed`
///
/// so the emission stream is independent of how the elapsed time was
/// partitioned into calls (a stalled caller catching up in one large
/// step emits exactly what many small steps would have).
#[derive(Clone, Debug)]
pub struct ApConverter {
    period_ns: u128,
    carry_ns: u128,
    emitted: u64,
}

impl ApConverter {
    /// Construct a converter emitting one point per `ms_per_ap`
    /// milliseconds.
    ///
    /// # Panics
    ///
    /// Panics if `ms_per_ap` is zero; world configuration validates the
    /// rate before construction.
    pub fn new(ms_per_ap: u64) -> Self {
        assert!(ms_per_ap > 0, "action point period must be non-zero");
        Self {
            period_ns: u128::from(ms_per_ap) * 1_000_000,
            carry_ns: 0,
            emitted: 0,
        }
    }

    /// Feed `elapsed` wall-clock time; returns the points emitted now.
    pub fn advance(&mut self, elapsed: Duration) -> u64 {
        let total = self.carry_ns + elapsed.as_nanos();
        let points = total / self.period_ns;
        self.carry_ns = total % self.period_ns;
        // A u64 overflows only after ~58 000 years of emissions at the
        // fastest representable rate.
        let points = points as u64;
        self.emitted += points;
        points
    }

    /// The unconsumed remainder carried toward the next point.
    pub fn carry(&self) -> Duration {
        // carry_ns < period_ns <= u64::MAX ns, so the cast is lossless.
        Duration::from_nanos(self.carry_ns as u64)
    }

    /// Total points emitted since construction. Diagnostics only.
    pub fn total_emitted(&self) -> u64 {
        self.emitted
    }
}

/// Fires at most once per interval, measured against a caller-supplied
/// clock reading.
///
/// When [`exceeded`](IntervalTimer::exceeded) returns `true` the timer
/// rebases to the supplied instant, so a long stall yields one firing,
/// not a burst of catch-up firings.
#[derive(Clone, Copy, Debug)]
pub struct IntervalTimer {
    every: Duration,
    last: Instant,
}

impl IntervalTimer {
    /// Construct a timer that fires once `every` has elapsed past `now`.
    pub fn new(every: Duration, now: Instant) -> Self {
        Self { every, last: now }
    }

    /// Whether the interval has elapsed; rebases the timer when it has.
    pub fn exceeded(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.every {
            self.last = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ApConverter ──────────────────────────────────────────────

    #[test]
    fn emits_nothing_below_one_period() {
        let mut c = ApConverter::new(10);
        assert_eq!(c.advance(Duration::from_millis(9)), 0);
        assert_eq!(c.total_emitted(), 0);
        assert_eq!(c.carry(), Duration::from_millis(9));
    }

    #[test]
    fn carry_accumulates_across_calls() {
        // 3ms + 4ms + 5ms at 10ms per point: 0, 0, 1 with 2ms left over.
        let mut c = ApConverter::new(10);
        assert_eq!(c.advance(Duration::from_millis(3)), 0);
        assert_eq!(c.advance(Duration::from_millis(4)), 0);
        assert_eq!(c.advance(Duration::from_millis(5)), 1);
        assert_eq!(c.carry(), Duration::from_millis(2));
        assert_eq!(c.total_emitted(), 1);
    }

    #[test]
    fn large_step_emits_many_points() {
        let mut c = ApConverter::new(100);
        assert_eq!(c.advance(Duration::from_millis(1234)), 12);
        assert_eq!(c.carry(), Duration::from_millis(34));
    }

    #[test]
    fn sub_millisecond_elapsed_is_not_lost() {
        let mut c = ApConverter::new(1);
        for _ in 0..3 {
            assert_eq!(c.advance(Duration::from_micros(250)), 0);
        }
        // The fourth quarter completes the millisecond.
        assert_eq!(c.advance(Duration::from_micros(250)), 1);
        assert_eq!(c.carry(), Duration::ZERO);
        assert_eq!(c.total_emitted(), 1);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn zero_rate_panics() {
        let _ = ApConverter::new(0);
    }

    // ── IntervalTimer ────────────────────────────────────────────

    #[test]
    fn fires_once_per_interval() {
        let start = Instant::now();
        let mut t = IntervalTimer::new(Duration::from_secs(60), start);
        assert!(!t.exceeded(start + Duration::from_secs(59)));
        assert!(t.exceeded(start + Duration::from_secs(60)));
        // Rebased: the next firing is a full interval away again.
        assert!(!t.exceeded(start + Duration::from_secs(61)));
        assert!(t.exceeded(start + Duration::from_secs(121)));
    }

    #[test]
    fn long_stall_yields_single_firing() {
        let start = Instant::now();
        let mut t = IntervalTimer::new(Duration::from_secs(60), start);
        assert!(t.exceeded(start + Duration::from_secs(600)));
        assert!(!t.exceeded(start + Duration::from_secs(601)));
    }

    // ── conservation property ────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// For any partitioning of elapsed time into converter
            /// calls, the emission total equals the whole-period count
            /// of the summed elapsed time: no point is created or
            /// destroyed by the partitioning.
            #[test]
            fn emission_is_partition_independent(
                ms_per_ap in 1u64..500,
                slices in prop::collection::vec(0u64..10_000, 0..64),
            ) {
                let mut c = ApConverter::new(ms_per_ap);
                let mut emitted = 0u64;
                for ms in &slices {
                    emitted += c.advance(Duration::from_millis(*ms));
                }
                let total_ms: u64 = slices.iter().sum();
                prop_assert_eq!(emitted, total_ms / ms_per_ap);
                prop_assert_eq!(c.total_emitted(), emitted);
                prop_assert_eq!(
                    c.carry(),
                    Duration::from_millis(total_ms % ms_per_ap)
                );
            }
        }
    }
}
