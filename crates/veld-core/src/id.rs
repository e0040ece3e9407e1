//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies a simulated character: a player, monster, or NPC.
///
/// Character IDs are unique across all three categories within one
/// simulation process. Persistent characters (players, scripted NPCs)
/// carry IDs assigned by the account/world database; transient
/// characters (spawned monsters) draw fresh IDs from
/// [`CharacterId::next_transient`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CharacterId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Counter for transient (monster) ID allocation.
///
/// Starts high so generated IDs never collide with database-assigned
/// character IDs in practice.
static TRANSIENT_ID_COUNTER: AtomicU32 = AtomicU32::new(0x4000_0000);

impl CharacterId {
    /// Allocate a fresh ID for a transient character.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next_transient() -> Self {
        Self(TRANSIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_inner() {
        assert_eq!(CharacterId(42).to_string(), "42");
    }

    #[test]
    fn transient_ids_are_unique() {
        let a = CharacterId::next_transient();
        let b = CharacterId::next_transient();
        assert_ne!(a, b);
    }

    #[test]
    fn transient_ids_avoid_low_range() {
        assert!(CharacterId::next_transient().0 >= 0x4000_0000);
    }
}
