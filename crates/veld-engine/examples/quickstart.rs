//! Minimal world-server loop: spawn the runtime, join a player, issue
//! commands from the "network" side, and let a recurring background
//! task interleave with the simulation.
//!
//! Run with `RUST_LOG=debug cargo run --example quickstart` to watch
//! the engine's tracing output.

use std::thread;
use std::time::Duration;

use veld_core::{CharacterId, Command, CommandError, Position};
use veld_engine::entity::{Player, PlayerSeed};
use veld_engine::rules::NoRules;
use veld_engine::runtime::Runtime;
use veld_engine::world::World;
use veld_engine::WorldConfig;

/// A movement command: step one tile in a fixed direction.
struct Step {
    dx: i32,
    dy: i32,
}

impl Command<Player> for Step {
    fn name(&self) -> &str {
        "step"
    }

    fn min_action_points(&self) -> i32 {
        3
    }

    fn execute(&mut self, actor: &mut Player) -> Result<(), CommandError> {
        let mut pos = actor.position();
        pos.x += self.dx;
        pos.y += self.dy;
        actor.set_position(pos);
        tracing::info!(player = %actor.id(), position = %actor.position(), "stepped");
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = WorldConfig {
        ms_per_ap: 10,
        ..Default::default()
    };
    let world = World::new(config, Box::new(NoRules)).expect("valid config");

    let runtime = Runtime::spawn(world);
    runtime.scheduler().add_recurring(
        || tracing::info!("the weather shifts"),
        Duration::from_millis(400),
        "weather",
        false,
    );

    let handle = runtime
        .join(PlayerSeed {
            id: CharacterId(1),
            name: "wanderer".into(),
            position: Position::new(0, 0, 0),
        })
        .expect("simulation thread is running");

    for _ in 0..8 {
        handle.send(Box::new(Step { dx: 1, dy: 0 }));
        thread::sleep(Duration::from_millis(150));
    }

    let world = runtime.shutdown();
    let player = world.player(handle.id()).expect("still online");
    tracing::info!(
        position = %player.position(),
        used_ap = world.clock().used_ap(),
        "simulation stopped"
    );
}
