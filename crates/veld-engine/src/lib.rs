//! World pulse loop, command ingestion, and tick drivers for the veld
//! simulation core.
//!
//! The engine turns wall-clock time and asynchronously arriving client
//! commands into a deterministic, time-sliced sequence of game-state
//! updates. One simulation thread owns all authoritative state; network
//! threads interact only through per-player command queues and session
//! flags. Background work runs through the scheduler, interleaved
//! between pulses.
//!
//! Game rules — combat, crafting, AI, scripting, persistence — live
//! behind the [`Ruleset`](rules::Ruleset) trait; this crate guarantees
//! when they are invoked, not what they do.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod entity;
pub mod metrics;
pub mod queue;
pub mod rules;
pub mod runtime;
pub mod world;

pub use clock::WorldClock;
pub use config::{ConfigError, WorldConfig};
pub use entity::{Monster, Npc, Player, PlayerSeed};
pub use metrics::PulseMetrics;
pub use queue::{BoxedCommand, CommandQueue};
pub use rules::{NoRules, Ruleset};
pub use runtime::{PlayerHandle, Runtime, SessionError};
pub use world::World;
