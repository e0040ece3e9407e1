//! Fixture helpers for constructing test worlds.

use std::time::Duration;

use veld_core::{CharacterId, Position};
use veld_engine::config::WorldConfig;
use veld_engine::entity::PlayerSeed;
use veld_engine::rules::{NoRules, Ruleset};
use veld_engine::world::World;

/// A configuration tuned for tests: one action point per millisecond
/// and a short scheduler slice, so pulses in a tight loop make visible
/// progress without long sleeps.
pub fn fast_config() -> WorldConfig {
    WorldConfig {
        ms_per_ap: 1,
        scheduler_slice: Duration::from_millis(5),
        ..Default::default()
    }
}

/// A fast-clocked world with no game rules attached.
pub fn fast_world() -> World {
    World::new(fast_config(), Box::new(NoRules)).expect("fast_config validates")
}

/// A fast-clocked world with the given ruleset.
pub fn world_with_rules(rules: Box<dyn Ruleset>) -> World {
    World::new(fast_config(), rules).expect("fast_config validates")
}

/// A player seed at the origin.
pub fn player_seed(id: u32) -> PlayerSeed {
    PlayerSeed {
        id: CharacterId(id),
        name: format!("player-{id}"),
        position: Position::default(),
    }
}
