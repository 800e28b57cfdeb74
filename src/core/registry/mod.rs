//=========================================================================
// Manager Registry
//=========================================================================
//
// Process-lifetime owner of one manager per manager kind.
//
// Architecture:
//   Registry
//     ├─ managers: [Box<dyn ErasedManager>; ManagerKind::COUNT]
//     ├─ context: TickContext
//     └─ pending: CommandQueue
//
// Flow:
//   run_phase() → pending commands → managers (kind order) → queued commands
//
//=========================================================================

//=== Module Declarations =================================================

mod erased;
mod manager_registry;

//=== Public API ==========================================================

pub use manager_registry::{DynManager, Registry};
