//=========================================================================
// Group Managers
//=========================================================================
//
// One manager per manager kind owns that kind's groups.
//
// Architecture:
//   Manager<T>
//     ├─ groups: Vec<Group<T>>       (all groups, creation order)
//     └─ active: IndexSet<usize>     (open groups, dispatch order)
//
// Flow:
//   run_phase() → active groups → members
//   TickContext commands → apply() at tick boundary
//
//=========================================================================

//=== Module Declarations =================================================

mod command_queue;
mod error;
mod group_manager;

//=== Public API ==========================================================

pub use command_queue::{CommandQueue, GroupCommand};
pub use error::ManagerError;
pub use group_manager::Manager;
