//! Simulated characters: players, monsters, and NPCs.
//!
//! All three categories share the action-point pool from `veld-core`;
//! what differs is the session surface (players), liveness and routing
//! (monsters), and scripted behavior (NPCs, driven through the
//! ruleset). Entities live in the world's rosters and are touched only
//! by the simulation thread; the two `Arc`s a player shares with its
//! network connection (command queue, session flag) are the sole
//! cross-thread surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use veld_core::{ActionPool, CharacterId, IntervalTimer, Position};

use crate::queue::CommandQueue;

/// Lower clamp of every character's action-point band.
pub const MIN_ACTION_POINTS: i32 = 7;
/// Upper clamp of every character's action-point band.
pub const MAX_ACTION_POINTS: i32 = 21;
/// Lower clamp of every character's fight-point band.
pub const MIN_FIGHT_POINTS: i32 = 7;
/// Upper clamp of every character's fight-point band.
pub const MAX_FIGHT_POINTS: i32 = 21;

fn full_pool() -> ActionPool {
    ActionPool::new(
        MIN_ACTION_POINTS,
        MAX_ACTION_POINTS,
        MIN_FIGHT_POINTS,
        MAX_FIGHT_POINTS,
    )
}

/// The data a login brings into the world: everything needed to place
/// a player, sourced from the account database by the caller.
#[derive(Clone, Debug)]
pub struct PlayerSeed {
    /// Database-assigned character ID.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Where the player enters the world.
    pub position: Position,
}

/// A connected player character.
pub struct Player {
    id: CharacterId,
    name: String,
    position: Position,
    pool: ActionPool,
    queue: Arc<CommandQueue>,
    session: Arc<AtomicBool>,
    last_command: Instant,
    save_timer: IntervalTimer,
}

impl Player {
    /// Place a player into the world from its seed.
    ///
    /// `queue` and `session` are shared with the network side: the
    /// queue accepts commands from the connection's reader, and the
    /// session flag is cleared by whichever side disconnects first.
    pub fn new(
        seed: PlayerSeed,
        queue: Arc<CommandQueue>,
        session: Arc<AtomicBool>,
        now: Instant,
        save_interval: Duration,
    ) -> Self {
        Self {
            id: seed.id,
            name: seed.name,
            position: seed.position,
            pool: full_pool(),
            queue,
            session,
            last_command: now,
            save_timer: IntervalTimer::new(save_interval, now),
        }
    }

    /// The player's character ID.
    pub fn id(&self) -> CharacterId {
        self.id
    }

    /// The player's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current world position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Move the player; command execution and rules use this.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// The player's point pool.
    pub fn pool(&self) -> &ActionPool {
        &self.pool
    }

    /// Mutable access to the point pool.
    pub fn pool_mut(&mut self) -> &mut ActionPool {
        &mut self.pool
    }

    /// The command queue shared with the network connection.
    pub fn queue(&self) -> &Arc<CommandQueue> {
        &self.queue
    }

    /// Whether the session is still up.
    pub fn is_connected(&self) -> bool {
        self.session.load(Ordering::Acquire)
    }

    /// Tear the session down. Idempotent; callable from either side.
    pub fn disconnect(&self) {
        self.session.store(false, Ordering::Release);
    }

    /// Time since the player last issued a command.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_command)
    }

    /// Record command activity, resetting the idle clock.
    pub fn touch(&mut self, now: Instant) {
        self.last_command = now;
    }

    /// Whether the periodic save is due; rebases the save timer when it
    /// is.
    pub fn save_due(&mut self, now: Instant) -> bool {
        self.save_timer.exceeded(now)
    }
}

/// A spawned monster.
pub struct Monster {
    id: CharacterId,
    position: Position,
    pool: ActionPool,
    alive: bool,
    on_route: bool,
}

impl Monster {
    /// Spawn a monster at `position` with a fresh transient ID.
    pub fn spawn(position: Position) -> Self {
        Self {
            id: CharacterId::next_transient(),
            position,
            pool: full_pool(),
            alive: true,
            on_route: false,
        }
    }

    /// The monster's character ID.
    pub fn id(&self) -> CharacterId {
        self.id
    }

    /// Current world position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Move the monster; AI uses this.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// The monster's point pool.
    pub fn pool(&self) -> &ActionPool {
        &self.pool
    }

    /// Mutable access to the point pool.
    pub fn pool_mut(&mut self) -> &mut ActionPool {
        &mut self.pool
    }

    /// Whether the monster is still alive. Dead monsters are collected
    /// after the pass that observed the death.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark the monster dead. Removal is deferred to the end of the
    /// current pass.
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Whether the monster is following a route. Routed monsters run
    /// their AI even with no player nearby.
    pub fn is_on_route(&self) -> bool {
        self.on_route
    }

    /// Put the monster on or off a route.
    pub fn set_on_route(&mut self, on_route: bool) {
        self.on_route = on_route;
    }
}

/// A scripted non-player character.
pub struct Npc {
    id: CharacterId,
    name: String,
    position: Position,
    pool: ActionPool,
}

impl Npc {
    /// Place an NPC with its database-assigned ID.
    pub fn new(id: CharacterId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            pool: full_pool(),
        }
    }

    /// The NPC's character ID.
    pub fn id(&self) -> CharacterId {
        self.id
    }

    /// The NPC's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current world position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The NPC's point pool.
    pub fn pool(&self) -> &ActionPool {
        &self.pool
    }

    /// Mutable access to the point pool.
    pub fn pool_mut(&mut self) -> &mut ActionPool {
        &mut self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> PlayerSeed {
        PlayerSeed {
            id: CharacterId(7),
            name: "alrik".into(),
            position: Position::new(10, 20, 0),
        }
    }

    fn player(now: Instant) -> Player {
        Player::new(
            seed(),
            Arc::new(CommandQueue::new()),
            Arc::new(AtomicBool::new(true)),
            now,
            Duration::from_secs(600),
        )
    }

    #[test]
    fn player_starts_connected_with_full_pool() {
        let p = player(Instant::now());
        assert!(p.is_connected());
        assert!(p.pool().can_act());
        assert_eq!(p.pool().action_points(), MAX_ACTION_POINTS);
    }

    #[test]
    fn disconnect_is_visible_through_shared_flag() {
        let session = Arc::new(AtomicBool::new(true));
        let p = Player::new(
            seed(),
            Arc::new(CommandQueue::new()),
            Arc::clone(&session),
            Instant::now(),
            Duration::from_secs(600),
        );
        session.store(false, Ordering::Release);
        assert!(!p.is_connected());
        // And the other direction.
        let q = player(Instant::now());
        q.disconnect();
        assert!(!q.is_connected());
    }

    #[test]
    fn idle_clock_resets_on_touch() {
        let start = Instant::now();
        let mut p = player(start);
        let later = start + Duration::from_secs(90);
        assert_eq!(p.idle_for(later), Duration::from_secs(90));
        p.touch(later);
        assert_eq!(p.idle_for(later), Duration::ZERO);
    }

    #[test]
    fn save_fires_once_per_interval() {
        let start = Instant::now();
        let mut p = player(start);
        assert!(!p.save_due(start + Duration::from_secs(599)));
        assert!(p.save_due(start + Duration::from_secs(600)));
        assert!(!p.save_due(start + Duration::from_secs(601)));
    }

    #[test]
    fn spawned_monsters_get_unique_ids() {
        let a = Monster::spawn(Position::default());
        let b = Monster::spawn(Position::default());
        assert_ne!(a.id(), b.id());
        assert!(a.is_alive());
        assert!(!a.is_on_route());
    }

    #[test]
    fn killed_monster_reads_dead() {
        let mut m = Monster::spawn(Position::default());
        m.kill();
        assert!(!m.is_alive());
    }
}
