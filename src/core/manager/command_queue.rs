//=========================================================================
// Group Commands
//=========================================================================
//
// Structural changes requested while a phase is running.
//
// Objects cannot touch their manager during dispatch (it is mutably
// borrowed), so they queue commands here. The registry applies the
// queue at the tick boundary right after the phase finishes.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::handle::{GroupHandle, ManagerKind};

//=== GroupCommand ========================================================

/// A deferred change to a manager's active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupCommand {
    /// Adds a group to the active set.
    Open(GroupHandle),

    /// Removes a group from the active set.
    Close(GroupHandle),

    /// Flips a group's membership in the active set.
    Toggle(GroupHandle),

    /// Opens every group of a manager.
    OpenAll(ManagerKind),

    /// Closes every group of a manager.
    CloseAll(ManagerKind),
}

impl GroupCommand {
    /// Manager the command is routed to.
    pub fn kind(&self) -> ManagerKind {
        match self {
            Self::Open(handle) | Self::Close(handle) | Self::Toggle(handle) => handle.kind(),
            Self::OpenAll(kind) | Self::CloseAll(kind) => *kind,
        }
    }
}

//=== CommandQueue ========================================================

/// FIFO queue of group commands awaiting the next tick boundary.
#[derive(Debug, Default)]
pub struct CommandQueue {
    queue: Vec<GroupCommand>,
}

impl CommandQueue {
    /// Creates a new empty command queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a command to be applied at the next tick boundary.
    pub fn push(&mut self, command: GroupCommand) {
        self.queue.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all commands from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<GroupCommand> {
        std::mem::take(&mut self.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
