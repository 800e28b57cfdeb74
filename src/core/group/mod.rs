//=========================================================================
// Object Groups
//=========================================================================
//
// Ordered, independently activatable collections of simulation objects.
//
// Architecture:
//   Group<T>
//     ├─ members: SlotArena<T>   (slot + generation, stable handles)
//     └─ order: Vec<u32>         (live slots in update order)
//
// Flow:
//   Manager::run_phase() → Group::for_each_active() → GameObject hook
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::schedule::Phase;
use crate::core::TickContext;

//=== Module Declarations =================================================

mod object_group;
mod slots;

//=== Public API ==========================================================

pub use object_group::Group;

//=== GameObject Trait ====================================================

/// A simulation object stored in a group.
///
/// The manager core never looks inside objects; it only calls these
/// hooks while the owning group is open.
///
/// # Minimal Implementation
///
/// Only `update_active()` is required. The slower phases and the render
/// extent setter default to doing nothing:
///
/// ```rust
/// use phasebound::prelude::*;
///
/// struct Spark {
///     life: u32,
/// }
///
/// impl GameObject for Spark {
///     fn update_active(&mut self, _ctx: &mut TickContext) {
///         self.life = self.life.saturating_sub(1);
///     }
/// }
/// ```
pub trait GameObject: Send + 'static {
    /// Called on every active-phase tick (per-frame simulation).
    fn update_active(&mut self, ctx: &mut TickContext);

    /// Called on every mid-phase tick (low-frequency bookkeeping).
    fn update_mid(&mut self, _ctx: &mut TickContext) {}

    /// Called on every slow-phase tick (periodic maintenance).
    fn update_slow(&mut self, _ctx: &mut TickContext) {}

    /// Called on every passive-phase tick (rare housekeeping).
    fn update_passive(&mut self, _ctx: &mut TickContext) {}

    /// Receives the uniform display size configured on the group.
    fn set_render_extent(&mut self, _width: u32, _height: u32) {}

    /// Routes `phase` to the matching hook.
    fn run_phase(&mut self, phase: Phase, ctx: &mut TickContext) {
        match phase {
            Phase::Active => self.update_active(ctx),
            Phase::Mid => self.update_mid(ctx),
            Phase::Slow => self.update_slow(ctx),
            Phase::Passive => self.update_passive(ctx),
        }
    }
}

impl GameObject for Box<dyn GameObject> {
    fn update_active(&mut self, ctx: &mut TickContext) {
        (**self).update_active(ctx)
    }

    fn update_mid(&mut self, ctx: &mut TickContext) {
        (**self).update_mid(ctx)
    }

    fn update_slow(&mut self, ctx: &mut TickContext) {
        (**self).update_slow(ctx)
    }

    fn update_passive(&mut self, ctx: &mut TickContext) {
        (**self).update_passive(ctx)
    }

    fn set_render_extent(&mut self, width: u32, height: u32) {
        (**self).set_render_extent(width, height)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counter {
        calls: [u32; 4],
    }

    impl GameObject for Counter {
        fn update_active(&mut self, _ctx: &mut TickContext) {
            self.calls[0] += 1;
        }
        fn update_mid(&mut self, _ctx: &mut TickContext) {
            self.calls[1] += 1;
        }
        fn update_slow(&mut self, _ctx: &mut TickContext) {
            self.calls[2] += 1;
        }
        fn update_passive(&mut self, _ctx: &mut TickContext) {
            self.calls[3] += 1;
        }
    }

    #[test]
    fn run_phase_routes_to_matching_hook() {
        let mut ctx = TickContext::new();
        let mut counter = Counter::default();

        for phase in Phase::ALL {
            counter.run_phase(phase, &mut ctx);
        }
        counter.run_phase(Phase::Mid, &mut ctx);

        assert_eq!(counter.calls, [1, 2, 1, 1]);
    }

    struct Shared(Arc<AtomicU32>);

    impl GameObject for Shared {
        fn update_active(&mut self, _ctx: &mut TickContext) {
            self.0.fetch_add(1, AtomicOrdering::SeqCst);
        }
        fn update_slow(&mut self, _ctx: &mut TickContext) {
            self.0.fetch_add(100, AtomicOrdering::SeqCst);
        }
        fn set_render_extent(&mut self, width: u32, height: u32) {
            self.0.fetch_add(width * height, AtomicOrdering::SeqCst);
        }
    }

    #[test]
    fn boxed_object_forwards_hooks() {
        let hits = Arc::new(AtomicU32::new(0));
        let mut ctx = TickContext::new();
        let mut boxed: Box<dyn GameObject> = Box::new(Shared(Arc::clone(&hits)));

        boxed.run_phase(Phase::Active, &mut ctx);
        boxed.run_phase(Phase::Slow, &mut ctx);
        boxed.run_phase(Phase::Passive, &mut ctx);
        boxed.set_render_extent(2, 3);

        assert_eq!(hits.load(AtomicOrdering::SeqCst), 107);
    }
}
