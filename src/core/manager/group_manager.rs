//=========================================================================
// Manager
//=========================================================================
//
// Owns every group of one manager kind and the subset currently open.
//
// Groups are stored in a Vec and referenced by index; the active subset
// is an insertion-ordered set of those indices. Only open groups receive
// phase dispatches, in the order they were opened.
//
//=========================================================================

//=== External Dependencies ===============================================

use indexmap::IndexSet;
use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::{GroupCommand, ManagerError};
use crate::core::group::{GameObject, Group};
use crate::core::handle::{GroupHandle, ManagerKind, ObjectHandle};
use crate::core::schedule::Phase;
use crate::core::TickContext;

//=== Manager =============================================================

/// Typed collection of groups for one [`ManagerKind`].
///
/// The manager is the only place handles are minted and the only path
/// that changes the active set, so the group flags and the set cannot
/// drift apart.
///
/// # Example
///
/// ```rust
/// use phasebound::prelude::*;
///
/// struct Mote;
/// impl GameObject for Mote {
///     fn update_active(&mut self, _ctx: &mut TickContext) {}
/// }
///
/// let mut manager = Manager::new(ManagerKind::Effect);
/// let sparks = manager.add_group();
/// manager.add_member(sparks, Mote);
///
/// manager.open_group(sparks);
/// assert_eq!(manager.active_object_count(), 1);
/// ```
pub struct Manager<T> {
    kind: ManagerKind,
    groups: Vec<Group<T>>,
    active: IndexSet<usize>,
    epoch: u32,
}

impl<T> Manager<T> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty manager with no groups.
    pub fn new(kind: ManagerKind) -> Self {
        Self {
            kind,
            groups: Vec::new(),
            active: IndexSet::new(),
            epoch: 0,
        }
    }

    pub fn kind(&self) -> ManagerKind {
        self.kind
    }

    /// Number of times the group list has been cleared.
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Moves an empty manager to `epoch`, so handles minted under an
    /// earlier owner of this kind stay stale.
    pub(crate) fn set_epoch(&mut self, epoch: u32) {
        debug_assert!(self.groups.is_empty(), "epoch changed on a populated manager");
        self.epoch = epoch;
    }

    //--- Group Creation ---------------------------------------------------

    /// Appends an empty, closed group and returns its handle.
    pub fn add_group(&mut self) -> GroupHandle {
        self.push_group(None)
    }

    /// Like [`Manager::add_group`], with a name for lookup and logging.
    pub fn add_named_group(&mut self, name: impl Into<String>) -> GroupHandle {
        self.push_group(Some(name.into()))
    }

    fn push_group(&mut self, name: Option<String>) -> GroupHandle {
        let handle = GroupHandle::new(self.kind, self.groups.len() as u32, self.epoch);
        debug!("Created group {} ({})", handle, name.as_deref().unwrap_or("unnamed"));
        self.groups.push(Group::new(handle, name));
        handle
    }

    /// Handle of the first group named `name`.
    pub fn find_group(&self, name: &str) -> Option<GroupHandle> {
        self.groups
            .iter()
            .find(|group| group.name() == Some(name))
            .map(Group::handle)
    }

    /// Drops every group. Handles issued before the call become stale.
    pub fn clear_groups(&mut self) {
        debug!(
            "Clearing {} manager: {} groups dropped",
            self.kind,
            self.groups.len()
        );
        self.groups.clear();
        self.active.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    //--- Resolution -------------------------------------------------------

    fn resolve(&self, handle: GroupHandle) -> Result<usize, ManagerError> {
        if handle.kind != self.kind {
            return Err(ManagerError::KindMismatch {
                expected: self.kind,
                found: handle.kind,
            });
        }
        if handle.epoch != self.epoch {
            return Err(ManagerError::StaleGroup {
                handle,
                epoch: self.epoch,
            });
        }

        let index = handle.index as usize;
        if index >= self.groups.len() {
            return Err(ManagerError::GroupOutOfRange {
                handle,
                count: self.groups.len(),
            });
        }
        Ok(index)
    }

    /// Resolves a group handle, returning why it failed.
    pub fn try_get_group(&self, handle: GroupHandle) -> Result<&Group<T>, ManagerError> {
        let index = self.resolve(handle)?;
        Ok(&self.groups[index])
    }

    pub fn try_get_group_mut(
        &mut self,
        handle: GroupHandle,
    ) -> Result<&mut Group<T>, ManagerError> {
        let index = self.resolve(handle)?;
        Ok(&mut self.groups[index])
    }

    /// Resolves a group handle, logging the reason on failure.
    pub fn get_group(&self, handle: GroupHandle) -> Option<&Group<T>> {
        self.try_get_group(handle).map_err(|e| e.report()).ok()
    }

    pub fn get_group_mut(&mut self, handle: GroupHandle) -> Option<&mut Group<T>> {
        self.try_get_group_mut(handle).map_err(|e| e.report()).ok()
    }

    /// Resolves an object handle, returning why it failed.
    pub fn try_get_member(&self, handle: ObjectHandle) -> Result<&T, ManagerError> {
        self.try_get_group(handle.group)?.try_get(handle)
    }

    /// Resolves an object handle, logging the reason on failure.
    pub fn get_member(&self, handle: ObjectHandle) -> Option<&T> {
        self.try_get_member(handle).map_err(|e| e.report()).ok()
    }

    pub fn get_member_mut(&mut self, handle: ObjectHandle) -> Option<&mut T> {
        self.try_get_group_mut(handle.group)
            .and_then(|group| group.try_get_mut(handle))
            .map_err(|e| e.report())
            .ok()
    }

    /// Removes the member behind `handle` from its group.
    pub fn remove_member(&mut self, handle: ObjectHandle) -> Option<T> {
        self.get_group_mut(handle.group)?.remove(handle)
    }

    //--- Activation -------------------------------------------------------

    /// Adds a group to the active set.
    ///
    /// Returns `true` if the set changed. Opening an open group is a
    /// no-op logged at `warn`; an unknown or stale handle is logged at
    /// `error`.
    pub fn open_group(&mut self, handle: GroupHandle) -> bool {
        let index = match self.resolve(handle) {
            Ok(index) => index,
            Err(e) => {
                error!("Cannot open group: {}", e);
                return false;
            }
        };

        if !self.active.insert(index) {
            warn!("Group {} is already open", handle);
            return false;
        }

        self.groups[index].set_active(true);
        debug!("Opened group {}", handle);
        self.debug_check();
        true
    }

    /// Removes a group from the active set.
    ///
    /// Returns `true` if the set changed. Closing a closed group is a
    /// reported no-op.
    pub fn close_group(&mut self, handle: GroupHandle) -> bool {
        let index = match self.resolve(handle) {
            Ok(index) => index,
            Err(e) => {
                error!("Cannot close group: {}", e);
                return false;
            }
        };

        // shift_remove keeps the dispatch order of the remaining groups
        if !self.active.shift_remove(&index) {
            warn!("Group {} is already closed", handle);
            return false;
        }

        self.groups[index].set_active(false);
        debug!("Closed group {}", handle);
        self.debug_check();
        true
    }

    /// Flips a group's membership in the active set.
    ///
    /// Returns `true` if the set changed, which is always the case for a
    /// valid handle.
    pub fn toggle_group(&mut self, handle: GroupHandle) -> bool {
        match self.resolve(handle) {
            Ok(index) if self.active.contains(&index) => self.close_group(handle),
            Ok(_) => self.open_group(handle),
            Err(e) => {
                error!("Cannot toggle group: {}", e);
                false
            }
        }
    }

    /// Opens every closed group, in group-list order. Returns how many opened.
    pub fn open_all(&mut self) -> usize {
        let mut opened = 0;
        for (index, group) in self.groups.iter_mut().enumerate() {
            if self.active.insert(index) {
                group.set_active(true);
                opened += 1;
            }
        }
        self.debug_check();
        opened
    }

    /// Closes every open group. Returns how many closed.
    pub fn close_all(&mut self) -> usize {
        let closed = self.active.len();
        for index in self.active.drain(..) {
            self.groups[index].set_active(false);
        }
        self.debug_check();
        closed
    }

    pub fn is_group_open(&self, handle: GroupHandle) -> bool {
        self.resolve(handle)
            .map(|index| self.active.contains(&index))
            .unwrap_or(false)
    }

    //--- Deferred Commands ------------------------------------------------

    /// Applies one queued command. Returns `true` if anything changed.
    pub fn apply(&mut self, command: GroupCommand) -> bool {
        if command.kind() != self.kind {
            error!(
                "Command {:?} routed to {} manager",
                command, self.kind
            );
            return false;
        }

        match command {
            GroupCommand::Open(handle) => self.open_group(handle),
            GroupCommand::Close(handle) => self.close_group(handle),
            GroupCommand::Toggle(handle) => self.toggle_group(handle),
            GroupCommand::OpenAll(_) => self.open_all() > 0,
            GroupCommand::CloseAll(_) => self.close_all() > 0,
        }
    }

    /// Applies commands in FIFO order. Returns how many changed anything.
    pub fn apply_commands<I>(&mut self, commands: I) -> usize
    where
        I: IntoIterator<Item = GroupCommand>,
    {
        commands
            .into_iter()
            .filter(|&command| self.apply(command))
            .count()
    }

    //--- Inspection -------------------------------------------------------

    /// All groups, in creation order.
    pub fn groups(&self) -> impl Iterator<Item = &Group<T>> + '_ {
        self.groups.iter()
    }

    /// Open groups, in dispatch order.
    pub fn active_groups(&self) -> impl Iterator<Item = &Group<T>> + '_ {
        let groups = &self.groups;
        self.active.iter().filter_map(move |&index| groups.get(index))
    }

    /// Calls `visitor` on every member of every open group, in dispatch order.
    pub fn visit_active<F>(&self, mut visitor: F)
    where
        F: FnMut(GroupHandle, &T),
    {
        for group in self.active_groups() {
            for member in group.iter() {
                visitor(group.handle(), member);
            }
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn active_group_count(&self) -> usize {
        self.active.len()
    }

    pub fn object_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn active_object_count(&self) -> usize {
        self.active_groups().map(Group::len).sum()
    }

    //--- Invariants -------------------------------------------------------

    /// Whether the active set and the group flags agree.
    pub(crate) fn is_consistent(&self) -> bool {
        self.active.iter().all(|&index| index < self.groups.len())
            && self
                .groups
                .iter()
                .enumerate()
                .all(|(index, group)| group.is_active() == self.active.contains(&index))
    }

    fn debug_check(&self) {
        debug_assert!(
            self.is_consistent(),
            "{} manager active set out of sync",
            self.kind
        );
    }
}

impl<T: GameObject> Manager<T> {
    //--- Members ----------------------------------------------------------

    /// Appends `obj` to `group`. Returns `None` if the group handle is invalid.
    pub fn add_member(&mut self, group: GroupHandle, obj: T) -> Option<ObjectHandle> {
        Some(self.get_group_mut(group)?.add_member(obj))
    }

    //--- Phase Dispatch ---------------------------------------------------

    /// Runs `phase` on every member of every open group.
    ///
    /// Groups run in the order they were opened; closed groups are
    /// skipped entirely. `ctx` must already be positioned on `phase`.
    pub fn run_phase(&mut self, phase: Phase, ctx: &mut TickContext) {
        for &index in &self.active {
            if let Some(group) = self.groups.get_mut(index) {
                group.for_each_active(phase, ctx);
            }
        }
    }

    pub fn update_active(&mut self, ctx: &mut TickContext) {
        self.run_phase(Phase::Active, ctx);
    }

    pub fn update_mid(&mut self, ctx: &mut TickContext) {
        self.run_phase(Phase::Mid, ctx);
    }

    pub fn update_slow(&mut self, ctx: &mut TickContext) {
        self.run_phase(Phase::Slow, ctx);
    }

    pub fn update_passive(&mut self, ctx: &mut TickContext) {
        self.run_phase(Phase::Passive, ctx);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
