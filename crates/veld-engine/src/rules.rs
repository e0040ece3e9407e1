//! The game-rule collaborator interface.
//!
//! The simulation core guarantees *when* and *how often* these hooks
//! run; their internals — combat math, AI, scripting, persistence —
//! live entirely on the other side of the trait. Every default body is
//! a no-op so integrations override only the hooks they use.

use veld_core::RuleError;

use crate::entity::{Monster, Npc, Player};

/// Game-rule hooks invoked by the tick drivers.
///
/// All methods run on the simulation thread. Fallible hooks are
/// containment boundaries: the driver logs an error with the entity
/// identity and continues with the remaining entities, so one failing
/// script never aborts a pass.
pub trait Ruleset: Send {
    /// Advance the player's long-running action (crafting, channeling),
    /// once per tick slice.
    fn advance_action(&mut self, _player: &mut Player) -> Result<(), RuleError> {
        Ok(())
    }

    /// Persist the player. Called once per configured save interval.
    fn save_player(&mut self, _player: &Player) -> Result<(), RuleError> {
        Ok(())
    }

    /// A player finished disconnecting and left the world.
    fn player_departed(&mut self, _player: &Player) {}

    /// Top up spawn points. Called once per configured spawn-check
    /// interval; returned monsters are inserted into the world.
    fn replenish_spawns(&mut self) -> Result<Vec<Monster>, RuleError> {
        Ok(Vec::new())
    }

    /// Run one monster's AI. Only called when the monster can act and
    /// either a player is within activity range or the monster is on a
    /// route.
    fn monster_act(&mut self, _monster: &mut Monster) -> Result<(), RuleError> {
        Ok(())
    }

    /// A dead monster was removed from the world.
    fn monster_removed(&mut self, _monster: &Monster) {}

    /// Run one NPC's script. Only called with a player nearby.
    fn npc_act(&mut self, _npc: &mut Npc) -> Result<(), RuleError> {
        Ok(())
    }
}

/// A ruleset that does nothing. Useful for benchmarks and tests that
/// exercise only the core's own mechanics.
pub struct NoRules;

impl Ruleset for NoRules {}

#[cfg(test)]
mod tests {
    use super::*;
    use veld_core::Position;

    #[test]
    fn default_hooks_are_noops() {
        let mut rules = NoRules;
        let mut monster = Monster::spawn(Position::default());
        assert!(rules.monster_act(&mut monster).is_ok());
        assert!(rules.replenish_spawns().unwrap().is_empty());
        rules.monster_removed(&monster);
    }
}
