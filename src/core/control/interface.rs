//=========================================================================
// Control Interface
//=========================================================================
//
// Messages into the core thread, and runtime errors.
//
// The core thread is the only owner of the registry. Every other thread
// reaches it by sending a ControlEvent over the control channel.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::manager::GroupCommand;
use crate::core::schedule::Phase;

//=== ControlEvent ========================================================

/// Requests sent to the core thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Change a manager's active set at the next tick boundary.
    Group(GroupCommand),

    /// Stop dispatching a phase until restarted.
    StopPhase(Phase),

    /// Resume a stopped phase, one period from now.
    StartPhase(Phase),

    /// Exit the core loop.
    Shutdown,
}

//=== EngineError =========================================================

/// Runtime errors surfaced by [`EngineHandle`](crate::EngineHandle).
#[derive(Debug)]
pub enum EngineError {
    /// The core thread is gone; the event could not be delivered.
    ChannelClosed,

    /// The core thread panicked while running phases.
    CoreThreadPanicked(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelClosed => write!(f, "Control channel closed"),
            Self::CoreThreadPanicked(e) => write!(f, "Core thread panicked: {}", e),
        }
    }
}

impl std::error::Error for EngineError {}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(EngineError::ChannelClosed.to_string(), "Control channel closed");
        assert_eq!(
            EngineError::CoreThreadPanicked("boom".into()).to_string(),
            "Core thread panicked: boom"
        );
    }
}
