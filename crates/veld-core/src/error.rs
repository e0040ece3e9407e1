//! Error types for the veld simulation core.
//!
//! Organized by containment boundary: per-command failures
//! ([`CommandError`]) and per-entity game-rule failures
//! ([`RuleError`]). Both are logged and absorbed at their boundary;
//! neither unwinds past a tick.

use std::error::Error;
use std::fmt;

/// Errors from executing a single client command.
///
/// Returned by [`Command::execute`](crate::command::Command::execute).
/// The tick driver logs the failure with the command name, discards the
/// command, and continues with the rest of the entity's queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// The command's preconditions no longer hold against current world
    /// state (target gone, item moved, action already finished).
    PreconditionFailed {
        /// Human-readable description of the failed precondition.
        reason: String,
    },
    /// The game-rule layer reported a failure while executing.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreconditionFailed { reason } => {
                write!(f, "precondition failed: {reason}")
            }
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
        }
    }
}

impl Error for CommandError {}

/// Errors from a game-rule collaborator invoked during a tick.
///
/// Covers monster AI, NPC scripts, spawn replenishment, and the other
/// hooks behind the ruleset interface. The tick driver logs the failure
/// with the entity identity and continues with the remaining entities
/// in the category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleError {
    /// The collaborator failed while processing the entity.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The entity the collaborator was asked about no longer exists on
    /// its side (despawned by script, deleted from the database).
    EntityGone,
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::EntityGone => write!(f, "entity no longer exists"),
        }
    }
}

impl Error for RuleError {}
