//=========================================================================
// Handles
//=========================================================================
//
// Plain addressing values for groups and objects.
//
// Layout:
//   GroupHandle  = (kind, group_index, epoch)
//   ObjectHandle = (GroupHandle, slot, generation)
//
// `epoch` counts how many times the owning manager cleared its group
// list; `generation` counts how many times the slot was vacated. Both
// turn reuse of an index into a detectable mismatch instead of an alias.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::ManagerKind;

//=== GroupHandle =========================================================

/// Identifies one group inside one manager.
///
/// Only a [`Manager`](crate::core::manager::Manager) can mint these.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupHandle {
    pub(crate) kind: ManagerKind,
    pub(crate) index: u32,
    pub(crate) epoch: u32,
}

impl GroupHandle {
    pub(crate) const fn new(kind: ManagerKind, index: u32, epoch: u32) -> Self {
        Self { kind, index, epoch }
    }

    /// Manager kind this handle addresses.
    pub const fn kind(self) -> ManagerKind {
        self.kind
    }

    /// Position of the group in its manager's group list.
    pub const fn group_index(self) -> u32 {
        self.index
    }

    /// Manager epoch the handle was issued in.
    pub const fn epoch(self) -> u32 {
        self.epoch
    }
}

impl fmt::Debug for GroupHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group({}:{}e{})", self.kind, self.index, self.epoch)
    }
}

impl fmt::Display for GroupHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.index)
    }
}

//=== ObjectHandle ========================================================

/// Identifies one member of one group.
///
/// `member_index` is a slot in the group's arena, not a position in its
/// update order, so it survives removals and reorders of other members.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    pub(crate) group: GroupHandle,
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl ObjectHandle {
    pub(crate) const fn new(group: GroupHandle, slot: u32, generation: u32) -> Self {
        Self {
            group,
            slot,
            generation,
        }
    }

    /// Manager kind this handle addresses.
    pub const fn kind(self) -> ManagerKind {
        self.group.kind
    }

    /// Handle of the owning group.
    pub const fn group(self) -> GroupHandle {
        self.group
    }

    /// Index of the owning group.
    pub const fn group_index(self) -> u32 {
        self.group.index
    }

    /// Slot index inside the group.
    pub const fn member_index(self) -> u32 {
        self.slot
    }

    /// Slot generation at the time the handle was issued.
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Object({}:{}e{}/{}v{})",
            self.group.kind, self.group.index, self.group.epoch, self.slot, self.generation
        )
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}v{}", self.group, self.slot, self.generation)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
