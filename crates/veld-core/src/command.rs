//! The client command trait consumed by per-entity command queues.

use crate::error::CommandError;

/// A client-issued command awaiting execution on the simulation thread.
///
/// Commands are produced by the protocol-decoding layer, enqueued into
/// a per-entity command queue from network threads, and executed
/// sequentially during the owning entity's tick slice. The trait is
/// generic over the actor type so this crate stays free of engine
/// types; the engine instantiates it with its player type.
///
/// Each command carries a minimum action-point precondition. A command
/// reached at drain time with the precondition unmet is discarded, not
/// re-queued: action points accrue per tick, and a stale command must
/// not execute out of temporal order.
pub trait Command<Actor>: Send {
    /// Short command name for diagnostics and failure logs.
    fn name(&self) -> &str;

    /// Minimum action points the actor must hold for this command to
    /// execute. Zero (the default) means the command always runs.
    fn min_action_points(&self) -> i32 {
        0
    }

    /// Execute the command against its owning actor.
    ///
    /// Invoked exactly once, on the simulation thread, after the
    /// action-point precondition has been checked and deducted.
    fn execute(&mut self, actor: &mut Actor) -> Result<(), CommandError>;
}
