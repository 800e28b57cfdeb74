//=========================================================================
// Slot Arena
//=========================================================================
//
// Generation-checked storage backing a group.
//
// Layout:
//   slots:     [A v0, _ v1, C v0, _ v2]   ← value + generation per slot
//   free_list: [1, 3]                     ← vacated slots, reused LIFO
//
// Insert pops the free list or grows. Remove bumps the slot's generation
// so every handle issued for the old occupant stops resolving.
//
//=========================================================================

//=== SlotMiss ============================================================

/// Why a slot lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotMiss {
    /// Slot index was never allocated.
    OutOfRange,
    /// Slot was vacated; carries its current generation.
    Stale(u32),
}

//=== SlotArena ===========================================================

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

pub(crate) struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    live: usize,
}

impl<T> SlotArena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Stores `value`, returning its slot and generation.
    pub(crate) fn insert(&mut self, value: T) -> (u32, u32) {
        self.live += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return (index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        (index, 0)
    }

    pub(crate) fn get(&self, index: u32, generation: u32) -> Result<&T, SlotMiss> {
        let slot = self.slots.get(index as usize).ok_or(SlotMiss::OutOfRange)?;
        match &slot.value {
            Some(value) if slot.generation == generation => Ok(value),
            _ => Err(SlotMiss::Stale(slot.generation)),
        }
    }

    pub(crate) fn get_mut(&mut self, index: u32, generation: u32) -> Result<&mut T, SlotMiss> {
        let slot = self
            .slots
            .get_mut(index as usize)
            .ok_or(SlotMiss::OutOfRange)?;
        match &mut slot.value {
            Some(value) if slot.generation == generation => Ok(value),
            _ => Err(SlotMiss::Stale(slot.generation)),
        }
    }

    /// Occupant of `index` regardless of generation.
    pub(crate) fn value(&self, index: u32) -> Option<&T> {
        self.slots
            .get(index as usize)
            .and_then(|slot| slot.value.as_ref())
    }

    pub(crate) fn value_mut(&mut self, index: u32) -> Option<&mut T> {
        self.slots
            .get_mut(index as usize)
            .and_then(|slot| slot.value.as_mut())
    }

    pub(crate) fn generation(&self, index: u32) -> Option<u32> {
        self.slots.get(index as usize).map(|slot| slot.generation)
    }

    /// Vacates `index`, bumping its generation.
    pub(crate) fn remove(&mut self, index: u32) -> Option<T> {
        let slot = self.slots.get_mut(index as usize)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(index);
        self.live -= 1;
        Some(value)
    }

    /// Vacates every occupied slot.
    pub(crate) fn clear(&mut self) {
        for index in 0..self.slots.len() as u32 {
            self.remove(index);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_sequential() {
        let mut arena = SlotArena::new();
        assert_eq!(arena.insert("a"), (0, 0));
        assert_eq!(arena.insert("b"), (1, 0));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn recycle_bumps_generation() {
        let mut arena = SlotArena::new();
        let (slot, _) = arena.insert("a");
        assert_eq!(arena.remove(slot), Some("a"));

        let (reused, generation) = arena.insert("b");
        assert_eq!(reused, slot);
        assert_eq!(generation, 1);
    }

    #[test]
    fn stale_lookup_detected() {
        let mut arena = SlotArena::new();
        let (slot, generation) = arena.insert(10);
        arena.remove(slot);

        assert_eq!(arena.get(slot, generation), Err(SlotMiss::Stale(1)));
        arena.insert(20);
        assert_eq!(arena.get(slot, generation), Err(SlotMiss::Stale(1)));
        assert_eq!(arena.get(slot, 1), Ok(&20));
    }

    #[test]
    fn out_of_range_lookup_detected() {
        let arena: SlotArena<u8> = SlotArena::new();
        assert_eq!(arena.get(3, 0), Err(SlotMiss::OutOfRange));
        assert_eq!(arena.generation(3), None);
    }

    #[test]
    fn double_remove_is_none() {
        let mut arena = SlotArena::new();
        let (slot, _) = arena.insert(1);
        assert_eq!(arena.remove(slot), Some(1));
        assert_eq!(arena.remove(slot), None);
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.generation(slot), Some(1));
    }

    #[test]
    fn clear_invalidates_everything() {
        let mut arena = SlotArena::new();
        let a = arena.insert('a');
        let b = arena.insert('b');
        arena.clear();

        assert_eq!(arena.len(), 0);
        assert!(arena.get(a.0, a.1).is_err());
        assert!(arena.get(b.0, b.1).is_err());
        assert_eq!(arena.value(a.0), None);
    }

    #[test]
    fn get_mut_allows_update() {
        let mut arena = SlotArena::new();
        let (slot, generation) = arena.insert(1);
        *arena.get_mut(slot, generation).unwrap() += 41;
        assert_eq!(arena.value(slot), Some(&42));
        *arena.value_mut(slot).unwrap() += 1;
        assert_eq!(arena.get(slot, generation), Ok(&43));
    }
}
