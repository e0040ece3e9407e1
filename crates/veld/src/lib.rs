//! veld: a time-sliced simulation core for persistent multiplayer
//! world servers.
//!
//! This is the top-level facade crate that re-exports the public API
//! from the veld sub-crates. For most users, adding `veld` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use veld::prelude::*;
//!
//! // A client command, as the protocol layer would decode it.
//! struct Wave;
//! impl Command<Player> for Wave {
//!     fn name(&self) -> &str { "wave" }
//!     fn execute(&mut self, _actor: &mut Player) -> Result<(), CommandError> {
//!         Ok(())
//!     }
//! }
//!
//! // One action point per millisecond keeps this example quick.
//! let config = WorldConfig { ms_per_ap: 1, ..Default::default() };
//! let mut world = World::new(config, Box::new(NoRules)).unwrap();
//!
//! // The handle is what the network side holds: command enqueue plus
//! // session teardown, nothing else.
//! let handle = world.admit_player(PlayerSeed {
//!     id: CharacterId(1),
//!     name: "alrik".into(),
//!     position: Position::new(0, 0, 0),
//! });
//! handle.send(Box::new(Wave));
//!
//! // Let some simulated time accrue, then run one pulse.
//! std::thread::sleep(Duration::from_millis(5));
//! world.pulse();
//! assert_eq!(world.last_metrics().commands_executed, 1);
//! ```
//!
//! For a dedicated simulation thread, hand the world to
//! [`Runtime::spawn`](engine::runtime::Runtime::spawn) instead of
//! pulsing it yourself.
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `veld-core` | IDs, positions, point pools, the command trait |
//! | [`scheduler`] | `veld-scheduler` | Deadline-ordered background task scheduler |
//! | [`engine`] | `veld-engine` | World, tick drivers, command queues, runtime |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use veld_core as types;
pub use veld_engine as engine;
pub use veld_scheduler as scheduler;

/// The most commonly used types, re-exported flat.
pub mod prelude {
    pub use veld_core::{
        ActionPool, ApConverter, CharacterId, Command, CommandError, IntervalTimer, Position,
        RuleError,
    };
    pub use veld_engine::{
        CommandQueue, ConfigError, Monster, NoRules, Npc, Player, PlayerHandle, PlayerSeed,
        PulseMetrics, Runtime, Ruleset, SessionError, World, WorldConfig,
    };
    pub use veld_scheduler::Scheduler;
}
