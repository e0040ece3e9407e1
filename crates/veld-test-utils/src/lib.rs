//! Test utilities and recording doubles for veld development.
//!
//! Provides a scriptable [`Command`] implementation, a [`Ruleset`]
//! double that records every hook invocation, and fixture helpers for
//! constructing test worlds.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use veld_core::{CharacterId, Command, CommandError, RuleError};
use veld_engine::entity::{Monster, Npc, Player};
use veld_engine::rules::Ruleset;

mod fixtures;

pub use fixtures::{fast_config, fast_world, player_seed, world_with_rules};

/// Shared execution log filled by [`ScriptedCommand`]s as they run.
pub type CommandLog = Arc<Mutex<Vec<String>>>;

/// Fresh, empty command log.
pub fn command_log() -> CommandLog {
    Arc::default()
}

/// A command that appends its name to a shared log when executed.
///
/// Configure the action-point cost to exercise the stale-drop rule and
/// the `fail` flag to exercise per-command error containment.
pub struct ScriptedCommand {
    name: String,
    cost: i32,
    fail: bool,
    log: CommandLog,
}

impl ScriptedCommand {
    /// A free command.
    pub fn new(name: impl Into<String>, log: &CommandLog) -> Box<Self> {
        Self::build(name, 0, false, log)
    }

    /// A command requiring `cost` action points.
    pub fn costing(name: impl Into<String>, cost: i32, log: &CommandLog) -> Box<Self> {
        Self::build(name, cost, false, log)
    }

    /// A free command whose execution fails.
    pub fn failing(name: impl Into<String>, log: &CommandLog) -> Box<Self> {
        Self::build(name, 0, true, log)
    }

    fn build(name: impl Into<String>, cost: i32, fail: bool, log: &CommandLog) -> Box<Self> {
        Box::new(Self {
            name: name.into(),
            cost,
            fail,
            log: Arc::clone(log),
        })
    }
}

impl Command<Player> for ScriptedCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_action_points(&self) -> i32 {
        self.cost
    }

    fn execute(&mut self, _actor: &mut Player) -> Result<(), CommandError> {
        self.log.lock().unwrap().push(self.name.clone());
        if self.fail {
            return Err(CommandError::ExecutionFailed {
                reason: format!("scripted failure in {}", self.name),
            });
        }
        Ok(())
    }
}

/// A ruleset double that counts every hook invocation.
///
/// The shared handles stay valid after the ruleset is boxed into a
/// world, so tests clone them before construction and assert afterward.
#[derive(Default)]
pub struct CountingRules {
    pub monster_actions: Arc<AtomicUsize>,
    pub npc_actions: Arc<AtomicUsize>,
    pub action_advances: Arc<AtomicUsize>,
    pub saves: Arc<AtomicUsize>,
    pub departures: Arc<Mutex<Vec<CharacterId>>>,
    pub removed_monsters: Arc<Mutex<Vec<CharacterId>>>,
    /// Monsters handed to the world at the next spawn check.
    pub pending_spawns: Mutex<Vec<Monster>>,
    /// When set, `monster_act` fails after recording.
    pub fail_monster_act: bool,
}

impl Ruleset for CountingRules {
    fn advance_action(&mut self, _player: &mut Player) -> Result<(), RuleError> {
        self.action_advances.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn save_player(&mut self, _player: &Player) -> Result<(), RuleError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn player_departed(&mut self, player: &Player) {
        self.departures.lock().unwrap().push(player.id());
    }

    fn replenish_spawns(&mut self) -> Result<Vec<Monster>, RuleError> {
        Ok(self.pending_spawns.lock().unwrap().drain(..).collect())
    }

    fn monster_act(&mut self, _monster: &mut Monster) -> Result<(), RuleError> {
        self.monster_actions.fetch_add(1, Ordering::SeqCst);
        if self.fail_monster_act {
            return Err(RuleError::ExecutionFailed {
                reason: "scripted AI failure".into(),
            });
        }
        Ok(())
    }

    fn monster_removed(&mut self, monster: &Monster) {
        self.removed_monsters.lock().unwrap().push(monster.id());
    }

    fn npc_act(&mut self, _npc: &mut Npc) -> Result<(), RuleError> {
        self.npc_actions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
