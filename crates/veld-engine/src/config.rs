//! World configuration and validation.
//!
//! [`WorldConfig`] is the builder-input for constructing a simulation
//! world. [`validate()`](WorldConfig::validate) checks structural
//! invariants at startup; [`World::new`](crate::world::World::new)
//! calls it before anything else is built.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use veld_core::ACTION_POINT_UNIT;

/// Configuration for a simulation world.
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Milliseconds of wall-clock time per emitted action point.
    /// Default: [`ACTION_POINT_UNIT`] (100 ms, ten points per second).
    pub ms_per_ap: u64,
    /// How long a connected player may go without issuing a command
    /// before being forcibly disconnected. Default: 10 minutes.
    pub idle_timeout: Duration,
    /// How often each player's state is handed to the persistence hook.
    /// Default: 10 minutes.
    pub save_interval: Duration,
    /// How often the spawn-replenishment hook runs. Default: 1 minute.
    pub spawn_check_interval: Duration,
    /// Chebyshev range within which a player keeps monsters and NPCs
    /// active. Default: 60.
    pub activity_range: u32,
    /// Upper bound on how long one pulse may block in the scheduler
    /// waiting for background tasks. Default: 10 ms.
    pub scheduler_slice: Duration,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ms_per_ap: ACTION_POINT_UNIT as u64,
            idle_timeout: Duration::from_secs(600),
            save_interval: Duration::from_secs(600),
            spawn_check_interval: Duration::from_secs(60),
            activity_range: 60,
            scheduler_slice: Duration::from_millis(10),
        }
    }
}

impl WorldConfig {
    /// Check structural invariants.
    ///
    /// A zero action-point rate would divide by zero in the converter;
    /// zero intervals would fire their duties every pulse; a zero
    /// scheduler slice would starve background tasks under load.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ms_per_ap == 0 {
            return Err(ConfigError::ZeroApRate);
        }
        if self.scheduler_slice.is_zero() {
            return Err(ConfigError::ZeroSchedulerSlice);
        }
        if self.idle_timeout.is_zero() {
            return Err(ConfigError::ZeroInterval {
                which: "idle_timeout",
            });
        }
        if self.save_interval.is_zero() {
            return Err(ConfigError::ZeroInterval {
                which: "save_interval",
            });
        }
        if self.spawn_check_interval.is_zero() {
            return Err(ConfigError::ZeroInterval {
                which: "spawn_check_interval",
            });
        }
        Ok(())
    }
}

/// Errors from [`WorldConfig::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `ms_per_ap` is zero.
    ZeroApRate,
    /// `scheduler_slice` is zero.
    ZeroSchedulerSlice,
    /// A periodic duty interval is zero.
    ZeroInterval {
        /// Name of the offending field.
        which: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroApRate => write!(f, "ms_per_ap must be non-zero"),
            Self::ZeroSchedulerSlice => write!(f, "scheduler_slice must be non-zero"),
            Self::ZeroInterval { which } => write!(f, "{which} must be non-zero"),
        }
    }
}

impl Error for ConfigError {}
