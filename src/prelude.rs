//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use phasebound::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder, EngineHandle};
pub use crate::core::control::{ControlEvent, EngineError};

// Objects and groups
pub use crate::core::group::{GameObject, Group};
pub use crate::core::handle::{GroupHandle, ManagerKind, ObjectHandle};
pub use crate::core::TickContext;

// Managers
pub use crate::core::manager::{GroupCommand, Manager, ManagerError};
pub use crate::core::registry::{DynManager, Registry};

// Scheduling
pub use crate::core::schedule::{Phase, PhaseCadence, PhaseClock};
