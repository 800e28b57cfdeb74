//=========================================================================
// Group
//=========================================================================
//
// Ordered collection of objects of one element type.
//
// Members live in a slot arena; `order` lists their slots in update
// order. Positional operations work on `order`, handle operations on
// the arena, so removing or sorting never shifts another member's
// handle.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cmp::Ordering;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::slots::{SlotArena, SlotMiss};
use super::GameObject;
use crate::core::handle::{GroupHandle, ObjectHandle};
use crate::core::manager::ManagerError;
use crate::core::schedule::Phase;
use crate::core::TickContext;

//=== Group ===============================================================

/// An ordered, activatable collection of simulation objects.
///
/// Groups are created only by [`Manager::add_group`](crate::core::manager::Manager::add_group).
/// Insertion order is update order until the group is sorted.
pub struct Group<T> {
    handle: GroupHandle,
    name: Option<String>,
    active: bool,
    members: SlotArena<T>,
    order: Vec<u32>,
    render_extent: Option<(u32, u32)>,
}

impl<T> Group<T> {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(handle: GroupHandle, name: Option<String>) -> Self {
        Self {
            handle,
            name,
            active: false,
            members: SlotArena::new(),
            order: Vec::new(),
            render_extent: None,
        }
    }

    //--- Identity & State -------------------------------------------------

    pub fn handle(&self) -> GroupHandle {
        self.handle
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the owning manager currently has this group open.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn render_extent(&self) -> Option<(u32, u32)> {
        self.render_extent
    }

    //--- Resolution -------------------------------------------------------

    /// Member at update position `index`.
    pub fn get_member(&self, index: usize) -> Option<&T> {
        let slot = *self.order.get(index)?;
        self.members.value(slot)
    }

    pub fn get_member_mut(&mut self, index: usize) -> Option<&mut T> {
        let slot = *self.order.get(index)?;
        self.members.value_mut(slot)
    }

    /// Resolves a handle, logging the reason on failure.
    pub fn get(&self, handle: ObjectHandle) -> Option<&T> {
        self.try_get(handle).map_err(|e| e.report()).ok()
    }

    pub fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut T> {
        self.try_get_mut(handle).map_err(|e| e.report()).ok()
    }

    /// Resolves a handle, returning why it failed.
    pub fn try_get(&self, handle: ObjectHandle) -> Result<&T, ManagerError> {
        self.check_owner(handle)?;
        self.members
            .get(handle.slot, handle.generation)
            .map_err(|miss| Self::miss_error(handle, miss))
    }

    pub fn try_get_mut(&mut self, handle: ObjectHandle) -> Result<&mut T, ManagerError> {
        self.check_owner(handle)?;
        self.members
            .get_mut(handle.slot, handle.generation)
            .map_err(|miss| Self::miss_error(handle, miss))
    }

    /// Whether `handle` currently resolves in this group.
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.try_get(handle).is_ok()
    }

    /// Update position of the member behind `handle`.
    pub fn position_of(&self, handle: ObjectHandle) -> Option<usize> {
        self.try_get(handle).ok()?;
        self.order.iter().position(|&slot| slot == handle.slot)
    }

    fn check_owner(&self, handle: ObjectHandle) -> Result<(), ManagerError> {
        if handle.group != self.handle {
            return Err(ManagerError::WrongGroup {
                handle,
                group: self.handle,
            });
        }
        Ok(())
    }

    fn miss_error(handle: ObjectHandle, miss: SlotMiss) -> ManagerError {
        match miss {
            SlotMiss::OutOfRange => ManagerError::MemberOutOfRange { handle },
            SlotMiss::Stale(generation) => ManagerError::StaleMember { handle, generation },
        }
    }

    fn handle_for(&self, slot: u32) -> Option<ObjectHandle> {
        let generation = self.members.generation(slot)?;
        Some(ObjectHandle::new(self.handle, slot, generation))
    }

    //--- Removal ----------------------------------------------------------

    /// Removes the member at update position `index`.
    ///
    /// Later members move up one position; their handles stay valid.
    /// The removed member's handle stops resolving.
    pub fn remove_member(&mut self, index: usize) -> Option<T> {
        if index >= self.order.len() {
            warn!(
                "Cannot remove position {} from group {} ({} members)",
                index,
                self.handle,
                self.order.len()
            );
            return None;
        }

        let slot = self.order.remove(index);
        self.members.remove(slot)
    }

    /// Removes the member behind `handle`.
    pub fn remove(&mut self, handle: ObjectHandle) -> Option<T> {
        if let Err(e) = self.try_get(handle) {
            e.report();
            return None;
        }

        let index = self.order.iter().position(|&slot| slot == handle.slot)?;
        self.order.remove(index);
        debug!("Removed {} from group {}", handle, self.handle);
        self.members.remove(handle.slot)
    }

    //--- Ordering ---------------------------------------------------------

    /// Stable sort of the update order. Handles are unaffected.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let members = &self.members;
        self.order
            .sort_by(|&a, &b| match (members.value(a), members.value(b)) {
                (Some(a), Some(b)) => compare(a, b),
                _ => Ordering::Equal,
            });
    }

    /// Stable sort of the update order by a derived key.
    pub fn sort_by_key<K, F>(&mut self, mut key: F)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.sort_by(|a, b| key(a).cmp(&key(b)));
    }

    //--- Iteration --------------------------------------------------------

    /// Members in update order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let members = &self.members;
        self.order.iter().filter_map(move |&slot| members.value(slot))
    }

    /// Handles of the members in update order.
    pub fn handles(&self) -> impl Iterator<Item = ObjectHandle> + '_ {
        self.order.iter().filter_map(move |&slot| self.handle_for(slot))
    }

    /// Calls `visitor` on every member in update order.
    pub fn for_each_mut<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&mut T),
    {
        for &slot in &self.order {
            if let Some(member) = self.members.value_mut(slot) {
                visitor(member);
            }
        }
    }
}

impl<T: GameObject> Group<T> {
    //--- Insertion --------------------------------------------------------

    /// Appends `obj` to the update order.
    ///
    /// The group's render extent, if set, is applied before insertion.
    pub fn add_member(&mut self, mut obj: T) -> ObjectHandle {
        if let Some((width, height)) = self.render_extent {
            obj.set_render_extent(width, height);
        }

        let (slot, generation) = self.members.insert(obj);
        self.order.push(slot);
        ObjectHandle::new(self.handle, slot, generation)
    }

    /// Replaces every member with `new_sequence`, in that order.
    ///
    /// All previously issued handles stop resolving. Returns the handles
    /// of the new members, in sequence order.
    pub fn reset_order(&mut self, new_sequence: Vec<T>) -> Vec<ObjectHandle> {
        debug!(
            "Resetting group {}: {} members replaced by {}",
            self.handle,
            self.order.len(),
            new_sequence.len()
        );

        self.members.clear();
        self.order.clear();
        new_sequence
            .into_iter()
            .map(|obj| self.add_member(obj))
            .collect()
    }

    /// Sets a uniform display size for current and future members.
    pub fn set_member_render_extent(&mut self, width: u32, height: u32) {
        self.render_extent = Some((width, height));
        self.for_each_mut(|member| member.set_render_extent(width, height));
    }

    //--- Phase Dispatch ---------------------------------------------------

    /// Runs `phase` on every member in update order.
    ///
    /// Called by the owning manager only while the group is open.
    pub(crate) fn for_each_active(&mut self, phase: Phase, ctx: &mut TickContext) {
        debug_assert!(self.active, "phase dispatched to closed group {}", self.handle);
        self.for_each_mut(|member| member.run_phase(phase, ctx));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
