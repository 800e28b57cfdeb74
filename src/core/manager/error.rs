//=========================================================================
// Manager Errors
//=========================================================================
//
// Reasons a handle failed to resolve.
//
// Soft-failing accessors report these through `log` and return `None`;
// `try_*` accessors hand them to the caller instead.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{error, warn};

//=== Internal Dependencies ===============================================

use crate::core::handle::{GroupHandle, ManagerKind, ObjectHandle};

//=== ManagerError ========================================================

/// Handle resolution failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerError {
    /// Handle was minted by a manager of a different kind.
    KindMismatch {
        expected: ManagerKind,
        found: ManagerKind,
    },

    /// Group index beyond the manager's group list.
    GroupOutOfRange { handle: GroupHandle, count: usize },

    /// Group handle issued before the manager's group list was cleared.
    StaleGroup { handle: GroupHandle, epoch: u32 },

    /// Object handle presented to a group that did not issue it.
    WrongGroup {
        handle: ObjectHandle,
        group: GroupHandle,
    },

    /// Slot index beyond anything the group has allocated.
    MemberOutOfRange { handle: ObjectHandle },

    /// Slot has been vacated since the handle was issued.
    StaleMember { handle: ObjectHandle, generation: u32 },
}

impl ManagerError {
    /// Whether the failure can only come from a caller bug, as opposed
    /// to a handle that simply outlived its target.
    pub fn is_programming_error(&self) -> bool {
        matches!(self, Self::KindMismatch { .. } | Self::WrongGroup { .. })
    }

    /// Writes the error to the diagnostics sink at its severity.
    pub fn report(&self) {
        if self.is_programming_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }
    }
}

impl fmt::Display for ManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindMismatch { expected, found } => {
                write!(f, "handle for {} manager passed to {} manager", found, expected)
            }
            Self::GroupOutOfRange { handle, count } => {
                write!(f, "group {} out of range ({} groups)", handle, count)
            }
            Self::StaleGroup { handle, epoch } => {
                write!(
                    f,
                    "group {} is stale (issued in epoch {}, manager at epoch {})",
                    handle,
                    handle.epoch(),
                    epoch
                )
            }
            Self::WrongGroup { handle, group } => {
                write!(f, "object {} does not belong to group {}", handle, group)
            }
            Self::MemberOutOfRange { handle } => {
                write!(f, "object {} out of range", handle)
            }
            Self::StaleMember { handle, generation } => {
                write!(
                    f,
                    "object {} is stale (slot now at generation {})",
                    handle, generation
                )
            }
        }
    }
}

impl std::error::Error for ManagerError {}

//=========================================================================
// Unit Tests
//=========================================================================
