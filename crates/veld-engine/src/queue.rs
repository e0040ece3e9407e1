//! Per-player two-lane command queue.
//!
//! Network threads enqueue decoded client commands here; the
//! simulation thread drains them during the owning player's tick
//! slice. The immediate lane exists so latency-critical interactions
//! (aborting a channeled action, say) are not stuck behind a backlog of
//! queued moves.
//!
//! # Locking discipline
//!
//! One mutex guards both lanes. Critical sections are enqueue and the
//! lane swap-out only — command execution never happens under the lock.

use std::collections::VecDeque;
use std::mem;
use std::sync::Mutex;

use veld_core::Command;

use crate::entity::Player;

/// A client command boxed for queue storage.
pub type BoxedCommand = Box<dyn Command<Player>>;

/// The two FIFO lanes guarded together.
#[derive(Default)]
struct Lanes {
    immediate: VecDeque<BoxedCommand>,
    normal: VecDeque<BoxedCommand>,
}

/// Thread-safe two-lane command queue for one player.
///
/// Created with the player at login and dropped with the player at
/// logout; commands still queued at that point are discarded. Enqueue
/// is safe from any thread; draining is reserved to the simulation
/// thread.
#[derive(Default)]
pub struct CommandQueue {
    lanes: Mutex<Lanes>,
}

impl CommandQueue {
    /// Construct an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command to the normal lane.
    pub fn receive(&self, command: BoxedCommand) {
        self.lanes.lock().unwrap().normal.push_back(command);
    }

    /// Append a command to the immediate lane.
    pub fn receive_immediate(&self, command: BoxedCommand) {
        self.lanes.lock().unwrap().immediate.push_back(command);
    }

    /// Swap out the immediate lane for execution, in FIFO order.
    ///
    /// Simulation thread only.
    pub fn take_immediate(&self) -> VecDeque<BoxedCommand> {
        mem::take(&mut self.lanes.lock().unwrap().immediate)
    }

    /// Swap out the normal lane for execution, in FIFO order.
    ///
    /// Simulation thread only.
    pub fn take_normal(&self) -> VecDeque<BoxedCommand> {
        mem::take(&mut self.lanes.lock().unwrap().normal)
    }

    /// Total commands pending across both lanes.
    pub fn len(&self) -> usize {
        let lanes = self.lanes.lock().unwrap();
        lanes.immediate.len() + lanes.normal.len()
    }

    /// Whether both lanes are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
