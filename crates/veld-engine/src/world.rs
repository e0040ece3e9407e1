//! The world: rosters, tick drivers, and the pulse loop.
//!
//! [`World`] owns all authoritative simulation state and is touched by
//! exactly one thread. Each [`pulse()`](World::pulse) converts elapsed
//! wall-clock time into action points and, when at least one point has
//! accrued, runs the three per-category drivers in a fixed, documented
//! order: players, then monsters, then NPCs. Player-issued commands are
//! resolved before any AI reacts to them within the same pulse.
//!
//! Rosters are insertion-ordered maps, so entity processing order is
//! deterministic. Removal is always deferred to the end of a pass;
//! nothing mutates a roster mid-iteration.

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use smallvec::SmallVec;

use veld_core::{CharacterId, IntervalTimer, Position};
use veld_scheduler::Scheduler;

use crate::clock::WorldClock;
use crate::config::{ConfigError, WorldConfig};
use crate::entity::{Monster, Npc, Player, PlayerSeed};
use crate::metrics::PulseMetrics;
use crate::queue::{BoxedCommand, CommandQueue};
use crate::rules::Ruleset;
use crate::runtime::PlayerHandle;

/// The simulation world.
///
/// Constructed with a validated [`WorldConfig`] and a [`Ruleset`]
/// collaborator, then driven by calling [`pulse()`](World::pulse) in a
/// loop — directly for tests and lockstep harnesses, or via
/// [`Runtime`](crate::runtime::Runtime) for a dedicated simulation
/// thread.
pub struct World {
    config: WorldConfig,
    clock: WorldClock,
    scheduler: Arc<Scheduler>,
    rules: Box<dyn Ruleset>,
    players: IndexMap<CharacterId, Player>,
    monsters: IndexMap<CharacterId, Monster>,
    npcs: IndexMap<CharacterId, Npc>,
    spawn_timer: IntervalTimer,
    metrics: PulseMetrics,
}

impl World {
    /// Construct a world. Validates the configuration first.
    pub fn new(config: WorldConfig, rules: Box<dyn Ruleset>) -> Result<Self, ConfigError> {
        config.validate()?;
        let now = Instant::now();
        Ok(Self {
            clock: WorldClock::new(config.ms_per_ap, now),
            scheduler: Arc::new(Scheduler::new()),
            rules,
            players: IndexMap::new(),
            monsters: IndexMap::new(),
            npcs: IndexMap::new(),
            spawn_timer: IntervalTimer::new(config.spawn_check_interval, now),
            metrics: PulseMetrics::default(),
            config,
        })
    }

    /// The scheduler owned by this world. Any subsystem may register
    /// one-shot or recurring background work through it, from any
    /// thread.
    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    /// Counters from the most recent pulse.
    pub fn last_metrics(&self) -> &PulseMetrics {
        &self.metrics
    }

    /// The world clock, for uptime and cumulative-AP diagnostics.
    pub fn clock(&self) -> &WorldClock {
        &self.clock
    }

    /// Number of players currently in the world.
    pub fn players_online(&self) -> usize {
        self.players.len()
    }

    /// Number of live-or-pending-removal monsters in the world.
    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }

    /// Number of NPCs in the world.
    pub fn npc_count(&self) -> usize {
        self.npcs.len()
    }

    /// Look up a player.
    pub fn player(&self, id: CharacterId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Bring a player into the world, returning the handle the network
    /// side uses to enqueue commands and tear the session down.
    ///
    /// A second login for a character already online replaces the old
    /// session.
    pub fn admit_player(&mut self, seed: PlayerSeed) -> PlayerHandle {
        let now = Instant::now();
        let queue = Arc::new(CommandQueue::new());
        let session = Arc::new(AtomicBool::new(true));
        let player = Player::new(
            seed,
            Arc::clone(&queue),
            Arc::clone(&session),
            now,
            self.config.save_interval,
        );
        let id = player.id();
        tracing::info!(player = %id, name = player.name(), "player entered the world");
        if let Some(old) = self.players.insert(id, player) {
            tracing::warn!(player = %id, "replacing an existing session for this character");
            old.disconnect();
            self.rules.player_departed(&old);
        }
        PlayerHandle::new(id, queue, session, Arc::clone(&self.scheduler))
    }

    /// Mark a player's session as torn down. The player driver
    /// finalizes the removal on its next pass.
    pub fn part_player(&mut self, id: CharacterId) {
        if let Some(player) = self.players.get(&id) {
            player.disconnect();
        }
    }

    /// Add a monster to the world.
    pub fn add_monster(&mut self, monster: Monster) -> CharacterId {
        let id = monster.id();
        self.monsters.insert(id, monster);
        id
    }

    /// Add an NPC to the world.
    pub fn add_npc(&mut self, npc: Npc) -> CharacterId {
        let id = npc.id();
        self.npcs.insert(id, npc);
        id
    }

    /// Run one simulation pulse.
    ///
    /// Asks the clock how many action points have accrued; with at
    /// least one, runs the player, monster, and NPC drivers in that
    /// order. The scheduler then gets its bounded slice regardless of
    /// the gate, so background tasks make progress even on pulses with
    /// no simulation work.
    pub fn pulse(&mut self) {
        let start = Instant::now();
        self.metrics = PulseMetrics::default();
        let ap = self.clock.elapsed_ap(start);
        self.metrics.ap_granted = ap;
        if ap >= 1 {
            let ap = i32::try_from(ap).unwrap_or(i32::MAX);
            self.check_players(ap, start);
            self.check_monsters(ap, start);
            self.check_npcs(ap);
        }
        self.scheduler.run_once(self.config.scheduler_slice);
        self.metrics.duration_us = start.elapsed().as_micros() as u64;
    }

    /// The player driver: timeout, point grant, action advance, command
    /// drains, periodic save, deferred removal.
    fn check_players(&mut self, ap: i32, now: Instant) {
        let Self {
            ref mut players,
            ref mut rules,
            ref mut metrics,
            ref config,
            ..
        } = *self;

        let mut departed: SmallVec<[CharacterId; 4]> = SmallVec::new();
        for (id, player) in players.iter_mut() {
            metrics.players_processed += 1;

            if player.is_connected() && player.idle_for(now) >= config.idle_timeout {
                tracing::info!(player = %id, "idle timeout exceeded, disconnecting");
                player.disconnect();
            }
            if !player.is_connected() {
                departed.push(*id);
                continue;
            }

            player.pool_mut().grant(ap);

            if let Err(e) = rules.advance_action(player) {
                tracing::warn!(player = %id, error = %e, "long-running action update failed");
            }

            // Immediate lane fully drained before the normal lane.
            let queue = Arc::clone(player.queue());
            drain_lane(player, queue.take_immediate(), now, metrics);
            drain_lane(player, queue.take_normal(), now, metrics);

            if player.save_due(now) {
                if let Err(e) = rules.save_player(player) {
                    tracing::warn!(player = %id, error = %e, "periodic save failed");
                }
            }

            // A command may have torn the session down (logout).
            if !player.is_connected() {
                departed.push(*id);
            }
        }

        for id in departed {
            if let Some(player) = players.shift_remove(&id) {
                metrics.players_removed += 1;
                tracing::info!(player = %id, "player left the world");
                rules.player_departed(&player);
            }
        }
    }

    /// The monster driver: spawn replenishment, point grant, gated AI,
    /// deferred removal of the dead.
    fn check_monsters(&mut self, ap: i32, now: Instant) {
        if self.spawn_timer.exceeded(now) {
            match self.rules.replenish_spawns() {
                Ok(spawned) => {
                    for monster in spawned {
                        self.monsters.insert(monster.id(), monster);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "spawn replenishment failed"),
            }
        }

        let Self {
            ref mut monsters,
            ref mut rules,
            ref mut metrics,
            ref players,
            ref config,
            ..
        } = *self;

        // The monster pass runs one point behind the player pass.
        let grant = if ap > 1 { ap - 1 } else { ap };

        let mut dead: SmallVec<[CharacterId; 8]> = SmallVec::new();
        for (id, monster) in monsters.iter_mut() {
            metrics.monsters_processed += 1;
            if !monster.is_alive() {
                dead.push(*id);
                continue;
            }

            monster.pool_mut().grant(grant);

            // AI for monsters with no nearby observer is skipped
            // entirely unless the monster is following a route.
            let active = monster.is_on_route()
                || any_player_within(players, monster.position(), config.activity_range);
            if monster.pool().can_act() && active {
                if let Err(e) = rules.monster_act(monster) {
                    tracing::warn!(monster = %id, error = %e, "monster AI failed");
                }
            }

            if !monster.is_alive() {
                dead.push(*id);
            }
        }

        for id in dead {
            if let Some(monster) = monsters.shift_remove(&id) {
                metrics.monsters_removed += 1;
                tracing::debug!(monster = %id, "dead monster removed");
                rules.monster_removed(&monster);
            }
        }
    }

    /// The NPC driver: point grant and scripts gated on player
    /// proximity.
    fn check_npcs(&mut self, ap: i32) {
        let Self {
            ref mut npcs,
            ref mut rules,
            ref mut metrics,
            ref players,
            ref config,
            ..
        } = *self;

        for (id, npc) in npcs.iter_mut() {
            metrics.npcs_processed += 1;
            npc.pool_mut().grant(ap);
            if any_player_within(players, npc.position(), config.activity_range) {
                if let Err(e) = rules.npc_act(npc) {
                    tracing::warn!(npc = %id, error = %e, "npc script failed");
                }
            }
        }
    }
}

/// Whether any connected player is within `range` of `pos`.
fn any_player_within(players: &IndexMap<CharacterId, Player>, pos: Position, range: u32) -> bool {
    players
        .values()
        .any(|p| p.is_connected() && p.position().distance_to(&pos) <= range)
}

/// Execute one drained lane against its player, in FIFO order.
///
/// Each command marks activity; a command whose action-point
/// precondition is unmet at this moment is discarded, never re-queued,
/// and does not block the commands behind it. Execution errors are
/// contained here, at the per-command boundary.
fn drain_lane(
    player: &mut Player,
    mut batch: VecDeque<BoxedCommand>,
    now: Instant,
    metrics: &mut PulseMetrics,
) {
    for mut command in batch.drain(..) {
        player.touch(now);
        let cost = command.min_action_points();
        if !player.pool_mut().try_spend_action_points(cost) {
            tracing::debug!(
                player = %player.id(),
                command = %command.name(),
                cost,
                "dropping command with unmet action-point requirement"
            );
            metrics.commands_discarded += 1;
            continue;
        }
        match command.execute(player) {
            Ok(()) => metrics.commands_executed += 1,
            Err(e) => {
                tracing::warn!(
                    player = %player.id(),
                    command = %command.name(),
                    error = %e,
                    "command failed"
                );
                metrics.command_failures += 1;
            }
        }
    }
}
