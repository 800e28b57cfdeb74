//=========================================================================
// Handle Types
//=========================================================================
//
// Non-owning addressing values for groups and objects.
//
// Handles are Copy, carry no behavior, and never keep anything alive.
// Resolution always goes through the owning manager.
//
//=========================================================================

//=== Module Declarations =================================================

mod handles;
mod kind;

//=== Public API ==========================================================

pub use handles::{GroupHandle, ObjectHandle};
pub use kind::ManagerKind;
