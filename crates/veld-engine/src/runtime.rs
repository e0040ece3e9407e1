//! The dedicated simulation thread and the network-facing session
//! surface.
//!
//! [`Runtime::spawn`] moves a [`World`] onto a named background thread
//! that loops [`pulse()`](World::pulse) until shutdown. Network threads
//! never touch the world directly: logins travel over a bounded session
//! channel, and each login yields a [`PlayerHandle`] exposing exactly
//! the thread-safe surface a connection needs — command enqueue and
//! session teardown.
//!
//! The scheduler's urgent signal is the single wake mechanism: command
//! arrival, session requests, and shutdown all use it to cut the pulse
//! loop's bounded scheduler wait short.

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};

use veld_core::CharacterId;
use veld_scheduler::Scheduler;

use crate::entity::PlayerSeed;
use crate::queue::{BoxedCommand, CommandQueue};
use crate::world::World;

// ── SessionError ─────────────────────────────────────────────────

/// Error submitting a session request to the simulation thread.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    /// The simulation thread has shut down.
    Shutdown,
    /// The session channel is full (back-pressure).
    Busy,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shutdown => write!(f, "simulation thread has shut down"),
            Self::Busy => write!(f, "session channel full"),
        }
    }
}

impl Error for SessionError {}

// ── PlayerHandle ─────────────────────────────────────────────────

/// The network side's view of one connected player.
///
/// Cheap to clone; shares the player's command queue and session flag
/// with the simulation side. Enqueueing a command signals the scheduler
/// so a blocked pulse loop reacts with minimal latency.
#[derive(Clone)]
pub struct PlayerHandle {
    id: CharacterId,
    queue: Arc<CommandQueue>,
    session: Arc<AtomicBool>,
    scheduler: Arc<Scheduler>,
}

impl PlayerHandle {
    pub(crate) fn new(
        id: CharacterId,
        queue: Arc<CommandQueue>,
        session: Arc<AtomicBool>,
        scheduler: Arc<Scheduler>,
    ) -> Self {
        Self {
            id,
            queue,
            session,
            scheduler,
        }
    }

    /// The player's character ID.
    pub fn id(&self) -> CharacterId {
        self.id
    }

    /// Enqueue a command on the normal lane.
    pub fn send(&self, command: BoxedCommand) {
        self.queue.receive(command);
        self.scheduler.signal_urgent();
    }

    /// Enqueue a latency-critical command on the immediate lane.
    pub fn send_immediate(&self, command: BoxedCommand) {
        self.queue.receive_immediate(command);
        self.scheduler.signal_urgent();
    }

    /// Whether the session is still up.
    pub fn is_connected(&self) -> bool {
        self.session.load(Ordering::Acquire)
    }

    /// Tear the session down from the network side. The player driver
    /// finalizes the removal on its next pass.
    pub fn disconnect(&self) {
        self.session.store(false, Ordering::Release);
        self.scheduler.signal_urgent();
    }
}

// ── Runtime ──────────────────────────────────────────────────────

/// A session request travelling from a network thread to the pulse
/// loop.
enum SessionRequest {
    Join {
        seed: PlayerSeed,
        reply: Sender<PlayerHandle>,
    },
    Leave {
        id: CharacterId,
    },
}

/// Owns the simulation thread.
///
/// Dropping a running runtime shuts it down; [`shutdown`](Runtime::shutdown)
/// does the same but hands the [`World`] back for inspection or
/// persistence.
pub struct Runtime {
    session_tx: Sender<SessionRequest>,
    shutdown: Arc<AtomicBool>,
    scheduler: Arc<Scheduler>,
    thread: Option<JoinHandle<World>>,
}

impl Runtime {
    /// Move `world` onto a dedicated simulation thread and start
    /// pulsing.
    pub fn spawn(world: World) -> Self {
        let scheduler = Arc::clone(world.scheduler());
        let shutdown = Arc::new(AtomicBool::new(false));
        let (session_tx, session_rx) = bounded(64);

        let flag = Arc::clone(&shutdown);
        let thread = thread::Builder::new()
            .name("veld-pulse".into())
            .spawn(move || pulse_loop(world, session_rx, flag))
            .expect("failed to spawn simulation thread");

        Self {
            session_tx,
            shutdown,
            scheduler,
            thread: Some(thread),
        }
    }

    /// Bring a player into the world.
    ///
    /// Blocks until the pulse loop admits the player — at most one
    /// scheduler slice, since the request signals the urgent wake.
    pub fn join(&self, seed: PlayerSeed) -> Result<PlayerHandle, SessionError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.session_tx
            .try_send(SessionRequest::Join {
                seed,
                reply: reply_tx,
            })
            .map_err(|e| match e {
                crossbeam_channel::TrySendError::Full(_) => SessionError::Busy,
                crossbeam_channel::TrySendError::Disconnected(_) => SessionError::Shutdown,
            })?;
        self.scheduler.signal_urgent();
        reply_rx.recv().map_err(|_| SessionError::Shutdown)
    }

    /// Ask the pulse loop to log a player out.
    ///
    /// Equivalent to [`PlayerHandle::disconnect`]; exists for callers
    /// that only hold the character ID.
    pub fn leave(&self, id: CharacterId) -> Result<(), SessionError> {
        self.session_tx
            .try_send(SessionRequest::Leave { id })
            .map_err(|e| match e {
                crossbeam_channel::TrySendError::Full(_) => SessionError::Busy,
                crossbeam_channel::TrySendError::Disconnected(_) => SessionError::Shutdown,
            })?;
        self.scheduler.signal_urgent();
        Ok(())
    }

    /// The world's scheduler, for registering background work while the
    /// simulation runs.
    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    /// Stop the simulation thread and recover the world.
    pub fn shutdown(mut self) -> World {
        let handle = self.thread.take().expect("runtime already shut down");
        self.shutdown.store(true, Ordering::Release);
        self.scheduler.signal_urgent();
        handle.join().expect("simulation thread panicked")
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Some(handle) = self.thread.take() {
            self.shutdown.store(true, Ordering::Release);
            self.scheduler.signal_urgent();
            let _ = handle.join();
        }
    }
}

/// Body of the simulation thread: drain session requests, pulse,
/// repeat until shutdown. Returns the world through the join handle.
fn pulse_loop(
    mut world: World,
    session_rx: Receiver<SessionRequest>,
    shutdown: Arc<AtomicBool>,
) -> World {
    tracing::debug!("simulation thread started");
    loop {
        if shutdown.load(Ordering::Acquire) {
            break;
        }
        while let Ok(request) = session_rx.try_recv() {
            match request {
                SessionRequest::Join { seed, reply } => {
                    let handle = world.admit_player(seed);
                    // Best-effort reply: the caller may have given up.
                    let _ = reply.send(handle);
                }
                SessionRequest::Leave { id } => world.part_player(id),
            }
        }
        world.pulse();
    }
    tracing::debug!("simulation thread stopped");
    world
}
