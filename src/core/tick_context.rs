//=========================================================================
// Tick Context
//=========================================================================
//
// Data handed to every object while a phase runs.
//
// Contains:
// - phase: which pass is running
// - ticks: per-phase dispatch counters
// - commands: deferred group changes, applied at the tick boundary
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::handle::{GroupHandle, ManagerKind};
use crate::core::manager::{CommandQueue, GroupCommand};
use crate::core::schedule::Phase;

//=== TickContext =========================================================

/// Per-dispatch context passed to [`GameObject`](crate::core::group::GameObject) hooks.
///
/// Objects read the running phase and tick number from it and request
/// structural changes through it. Requests take effect after the
/// current phase completes, never mid-dispatch.
#[derive(Debug)]
pub struct TickContext {
    phase: Phase,
    ticks: [u64; 4],
    pub(crate) commands: CommandQueue,
}

impl TickContext {
    /// Creates a context positioned before the first active tick.
    pub fn new() -> Self {
        Self {
            phase: Phase::Active,
            ticks: [0; 4],
            commands: CommandQueue::new(),
        }
    }

    //--- Dispatch Bookkeeping ---------------------------------------------

    /// Marks the start of a dispatch of `phase`.
    pub(crate) fn begin(&mut self, phase: Phase) {
        self.phase = phase;
        self.ticks[phase.index()] += 1;
    }

    /// Takes the commands queued during the last dispatch.
    pub fn take_commands(&mut self) -> Vec<GroupCommand> {
        self.commands.take()
    }

    //--- Queries ----------------------------------------------------------

    /// Phase currently being dispatched.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of dispatches of the current phase so far, this one included.
    pub fn tick(&self) -> u64 {
        self.ticks[self.phase.index()]
    }

    /// Number of dispatches of `phase` so far.
    pub fn ticks(&self, phase: Phase) -> u64 {
        self.ticks[phase.index()]
    }

    /// Commands waiting for the tick boundary.
    pub fn pending_commands(&self) -> &CommandQueue {
        &self.commands
    }

    //--- Requests ---------------------------------------------------------

    pub fn submit(&mut self, command: GroupCommand) {
        self.commands.push(command);
    }

    pub fn open_group(&mut self, group: GroupHandle) {
        self.submit(GroupCommand::Open(group));
    }

    pub fn close_group(&mut self, group: GroupHandle) {
        self.submit(GroupCommand::Close(group));
    }

    pub fn toggle_group(&mut self, group: GroupHandle) {
        self.submit(GroupCommand::Toggle(group));
    }

    pub fn close_all(&mut self, kind: ManagerKind) {
        self.submit(GroupCommand::CloseAll(kind));
    }
}

impl Default for TickContext {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
