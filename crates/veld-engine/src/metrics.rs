//! Per-pulse diagnostics for the simulation loop.

/// Counters collected during a single pulse.
///
/// Reset at the start of each [`pulse()`](crate::world::World::pulse)
/// and readable afterwards via
/// [`last_metrics()`](crate::world::World::last_metrics). Intended for
/// telemetry and tests; nothing in the engine branches on them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PulseMetrics {
    /// Action points emitted by the world clock this pulse.
    pub ap_granted: u64,
    /// Players iterated by the player driver.
    pub players_processed: usize,
    /// Players removed after disconnecting or timing out.
    pub players_removed: usize,
    /// Commands executed across all player queues.
    pub commands_executed: u64,
    /// Commands discarded for an unmet action-point precondition.
    pub commands_discarded: u64,
    /// Commands whose execution returned an error.
    pub command_failures: u64,
    /// Monsters iterated by the monster driver.
    pub monsters_processed: usize,
    /// Dead monsters removed after the pass.
    pub monsters_removed: usize,
    /// NPCs iterated by the NPC driver.
    pub npcs_processed: usize,
    /// Wall-clock time for the whole pulse, in microseconds.
    pub duration_us: u64,
}
