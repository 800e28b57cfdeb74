//=========================================================================
// Erased Manager Trait
//=========================================================================
//
// Type-erased view of a Manager<T> so managers of different element
// types can sit side by side in the registry.
//
// Phase dispatch, command routing and counters go through the trait;
// typed access downcasts through `as_any`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use crate::core::group::GameObject;
use crate::core::handle::ManagerKind;
use crate::core::manager::{GroupCommand, Manager};
use crate::core::schedule::Phase;
use crate::core::TickContext;

//=========================================================================

/// Operations the registry performs without knowing the element type.
pub(super) trait ErasedManager: Send {
    fn kind(&self) -> ManagerKind;

    /// Clear count of the manager; see [`Manager::epoch`].
    fn epoch(&self) -> u32;

    /// Name of the stored element type, for diagnostics.
    fn element_type(&self) -> &'static str;

    fn run_phase(&mut self, phase: Phase, ctx: &mut TickContext);

    fn apply(&mut self, command: GroupCommand) -> bool;

    fn group_count(&self) -> usize;

    fn active_group_count(&self) -> usize;

    fn object_count(&self) -> usize;

    fn active_object_count(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=========================================================================

impl<T: GameObject> ErasedManager for Manager<T> {
    fn kind(&self) -> ManagerKind {
        Manager::kind(self)
    }

    fn epoch(&self) -> u32 {
        Manager::epoch(self)
    }

    fn element_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn run_phase(&mut self, phase: Phase, ctx: &mut TickContext) {
        Manager::run_phase(self, phase, ctx)
    }

    fn apply(&mut self, command: GroupCommand) -> bool {
        Manager::apply(self, command)
    }

    fn group_count(&self) -> usize {
        Manager::group_count(self)
    }

    fn active_group_count(&self) -> usize {
        Manager::active_group_count(self)
    }

    fn object_count(&self) -> usize {
        Manager::object_count(self)
    }

    fn active_object_count(&self) -> usize {
        Manager::active_object_count(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Tests
//=========================================================================
