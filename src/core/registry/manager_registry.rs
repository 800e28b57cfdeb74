//=========================================================================
// Registry
//=========================================================================
//
// Holds exactly one manager per manager kind and dispatches phases.
//
// Per phase dispatch:
//   1. apply commands submitted from outside since the last boundary
//   2. run the phase on every manager, in ManagerKind order
//   3. apply commands objects queued during the phase (tick boundary)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::erased::ErasedManager;
use crate::core::group::GameObject;
use crate::core::handle::ManagerKind;
use crate::core::manager::{CommandQueue, GroupCommand, Manager};
use crate::core::schedule::{Phase, PhaseClock};
use crate::core::TickContext;

//=== Type Aliases ========================================================

/// Manager over boxed trait objects, the default for every kind.
pub type DynManager = Manager<Box<dyn GameObject>>;

//=== Registry ============================================================

/// One manager per [`ManagerKind`], plus the shared tick context.
///
/// Created once at startup and owned by whatever drives the ticks; it is
/// never a global. Every kind starts with an empty [`DynManager`];
/// [`Registry::install`] swaps in a manager with a concrete element type.
///
/// # Example
///
/// ```rust
/// use phasebound::prelude::*;
///
/// struct Walker { steps: u32 }
/// impl GameObject for Walker {
///     fn update_active(&mut self, _ctx: &mut TickContext) { self.steps += 1; }
/// }
///
/// let mut registry = Registry::new();
/// registry.install(Manager::<Walker>::new(ManagerKind::Entity));
///
/// let entities = registry.manager_mut::<Walker>(ManagerKind::Entity).unwrap();
/// let group = entities.add_group();
/// let walker = entities.add_member(group, Walker { steps: 0 }).unwrap();
/// entities.open_group(group);
///
/// registry.update_active();
///
/// let entities = registry.manager::<Walker>(ManagerKind::Entity).unwrap();
/// assert_eq!(entities.get_member(walker).map(|w| w.steps), Some(1));
/// ```
pub struct Registry {
    managers: [Box<dyn ErasedManager>; ManagerKind::COUNT],
    context: TickContext,
    pending: CommandQueue,
}

impl Registry {
    //--- Construction -----------------------------------------------------

    /// Creates a registry with an empty [`DynManager`] for every kind.
    pub fn new() -> Self {
        let managers = ManagerKind::ALL
            .map(|kind| Box::new(DynManager::new(kind)) as Box<dyn ErasedManager>);

        Self {
            managers,
            context: TickContext::new(),
            pending: CommandQueue::new(),
        }
    }

    /// Replaces the manager for `manager.kind()`.
    ///
    /// Intended for setup. Groups held by the replaced manager are dropped,
    /// and handles it issued stay stale in the replacement: an empty
    /// incoming manager continues from the replaced manager's epoch. A
    /// populated manager is only accepted over one that never issued a
    /// handle; otherwise the install is refused and logged. Returns
    /// whether the manager was installed.
    pub fn install<T: GameObject>(&mut self, mut manager: Manager<T>) -> bool {
        let kind = manager.kind();
        let slot = &mut self.managers[kind.index()];
        let untouched = slot.epoch() == 0 && slot.group_count() == 0;

        if !untouched {
            if manager.group_count() > 0 {
                error!(
                    "Refusing to install a populated {} manager over one that issued handles",
                    kind
                );
                return false;
            }

            if slot.group_count() > 0 {
                warn!(
                    "Replacing {} manager discards {} group(s)",
                    kind,
                    slot.group_count()
                );
            }
            manager.set_epoch(manager.epoch().max(slot.epoch().wrapping_add(1)));
        }

        debug!(
            "Installed {} manager for {} (epoch {})",
            kind,
            std::any::type_name::<T>(),
            manager.epoch()
        );
        *slot = Box::new(manager);
        true
    }

    //--- Typed Access -----------------------------------------------------

    /// Typed view of the manager for `kind`.
    ///
    /// Returns `None` (and logs) if the installed element type is not `T`.
    pub fn manager<T: GameObject>(&self, kind: ManagerKind) -> Option<&Manager<T>> {
        let erased = &self.managers[kind.index()];
        let typed = erased.as_any().downcast_ref::<Manager<T>>();
        if typed.is_none() {
            Self::report_type_mismatch::<T>(kind, erased.element_type());
        }
        typed
    }

    pub fn manager_mut<T: GameObject>(&mut self, kind: ManagerKind) -> Option<&mut Manager<T>> {
        let erased = &mut self.managers[kind.index()];
        let element_type = erased.element_type();
        let typed = erased.as_any_mut().downcast_mut::<Manager<T>>();
        if typed.is_none() {
            Self::report_type_mismatch::<T>(kind, element_type);
        }
        typed
    }

    /// Manager for `kind` if it still holds boxed trait objects.
    pub fn dyn_manager(&self, kind: ManagerKind) -> Option<&DynManager> {
        self.manager::<Box<dyn GameObject>>(kind)
    }

    pub fn dyn_manager_mut(&mut self, kind: ManagerKind) -> Option<&mut DynManager> {
        self.manager_mut::<Box<dyn GameObject>>(kind)
    }

    fn report_type_mismatch<T>(kind: ManagerKind, installed: &str) {
        error!(
            "{} manager holds {}, not {}",
            kind,
            installed,
            std::any::type_name::<T>()
        );
    }

    //--- Commands ---------------------------------------------------------

    /// Queues a command for the next tick boundary.
    pub fn submit(&mut self, command: GroupCommand) {
        self.pending.push(command);
    }

    /// Applies every command queued so far. Returns how many changed anything.
    pub fn flush_commands(&mut self) -> usize {
        let mut commands = self.pending.take();
        commands.extend(self.context.take_commands());
        self.route(commands)
    }

    fn route(&mut self, commands: Vec<GroupCommand>) -> usize {
        let mut changed = 0;
        for command in commands {
            if self.managers[command.kind().index()].apply(command) {
                changed += 1;
            }
        }
        changed
    }

    //--- Phase Dispatch ---------------------------------------------------

    /// Runs `phase` across every manager in [`ManagerKind`] order.
    pub fn run_phase(&mut self, phase: Phase) {
        let pending = self.pending.take();
        self.route(pending);

        self.context.begin(phase);
        for manager in self.managers.iter_mut() {
            manager.run_phase(phase, &mut self.context);
        }

        let queued = self.context.take_commands();
        self.route(queued);
    }

    pub fn update_active(&mut self) {
        self.run_phase(Phase::Active);
    }

    pub fn update_mid(&mut self) {
        self.run_phase(Phase::Mid);
    }

    pub fn update_slow(&mut self) {
        self.run_phase(Phase::Slow);
    }

    pub fn update_passive(&mut self) {
        self.run_phase(Phase::Passive);
    }

    /// Runs every phase `clock` reports due at `now`. Returns how many ran.
    pub fn tick(&mut self, clock: &mut PhaseClock, now: Instant) -> usize {
        let due = clock.due(now);
        for &phase in &due {
            self.run_phase(phase);
        }
        due.len()
    }

    //--- Inspection -------------------------------------------------------

    /// Number of completed dispatches of `phase`.
    pub fn ticks(&self, phase: Phase) -> u64 {
        self.context.ticks(phase)
    }

    pub fn group_count(&self) -> usize {
        self.managers.iter().map(|m| m.group_count()).sum()
    }

    pub fn active_group_count(&self) -> usize {
        self.managers.iter().map(|m| m.active_group_count()).sum()
    }

    pub fn object_count(&self) -> usize {
        self.managers.iter().map(|m| m.object_count()).sum()
    }

    pub fn active_object_count(&self) -> usize {
        self.managers.iter().map(|m| m.active_object_count()).sum()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::core::handle::GroupHandle;
    use crate::core::schedule::PhaseCadence;

    type Trace = Arc<Mutex<Vec<(ManagerKind, Phase)>>>;

    struct Tracer {
        kind: ManagerKind,
        trace: Trace,
    }

    impl Tracer {
        fn record(&self, phase: Phase) {
            self.trace.lock().unwrap().push((self.kind, phase));
        }
    }

    impl GameObject for Tracer {
        fn update_active(&mut self, _ctx: &mut TickContext) {
            self.record(Phase::Active);
        }
        fn update_mid(&mut self, _ctx: &mut TickContext) {
            self.record(Phase::Mid);
        }
    }

    /// Closes its own group on the first active tick.
    struct Sleeper {
        group: GroupHandle,
        ticks: u32,
    }

    impl GameObject for Sleeper {
        fn update_active(&mut self, ctx: &mut TickContext) {
            self.ticks += 1;
            ctx.close_group(self.group);
        }
    }

    fn open_tracer(registry: &mut Registry, kind: ManagerKind, trace: &Trace) {
        let manager = registry.dyn_manager_mut(kind).unwrap();
        let group = manager.add_group();
        manager.add_member(
            group,
            Box::new(Tracer {
                kind,
                trace: Arc::clone(trace),
            }),
        );
        manager.open_group(group);
    }

    #[test]
    fn new_registry_has_one_empty_manager_per_kind() {
        let registry = Registry::new();
        for kind in ManagerKind::ALL {
            let manager = registry.dyn_manager(kind).unwrap();
            assert_eq!(manager.kind(), kind);
            assert_eq!(manager.group_count(), 0);
        }
        assert_eq!(registry.group_count(), 0);
    }

    #[test]
    fn dispatch_follows_kind_declaration_order() {
        let trace: Trace = Arc::default();
        let mut registry = Registry::new();
        open_tracer(&mut registry, ManagerKind::Effect, &trace);
        open_tracer(&mut registry, ManagerKind::Object, &trace);
        open_tracer(&mut registry, ManagerKind::Gui, &trace);

        registry.update_active();
        registry.update_mid();

        assert_eq!(
            *trace.lock().unwrap(),
            vec![
                (ManagerKind::Object, Phase::Active),
                (ManagerKind::Gui, Phase::Active),
                (ManagerKind::Effect, Phase::Active),
                (ManagerKind::Object, Phase::Mid),
                (ManagerKind::Gui, Phase::Mid),
                (ManagerKind::Effect, Phase::Mid),
            ]
        );
        assert_eq!(registry.ticks(Phase::Active), 1);
        assert_eq!(registry.ticks(Phase::Slow), 0);
    }

    #[test]
    fn typed_install_and_access() {
        let mut registry = Registry::new();
        registry.install(Manager::<Sleeper>::new(ManagerKind::Entity));

        assert!(registry.manager::<Sleeper>(ManagerKind::Entity).is_some());
        assert!(registry.dyn_manager(ManagerKind::Entity).is_none());
        assert!(registry.manager::<Sleeper>(ManagerKind::Item).is_none());
    }

    #[test]
    fn install_keeps_replaced_handles_stale() {
        let mut registry = Registry::new();
        let old = registry.dyn_manager_mut(ManagerKind::Entity).unwrap().add_group();

        assert!(registry.install(Manager::<Sleeper>::new(ManagerKind::Entity)));

        let entities = registry.manager_mut::<Sleeper>(ManagerKind::Entity).unwrap();
        let fresh = entities.add_named_group("fresh");
        assert_eq!(old.group_index(), fresh.group_index());
        assert_ne!(old.epoch(), fresh.epoch());
        assert!(!entities.open_group(old));
        assert!(!entities.is_group_open(fresh));
        assert!(entities.open_group(fresh));
    }

    #[test]
    fn install_refuses_populated_manager_over_used_one() {
        let mut registry = Registry::new();
        let old = registry.dyn_manager_mut(ManagerKind::Gui).unwrap().add_group();

        let mut widgets = Manager::<Sleeper>::new(ManagerKind::Gui);
        let group = widgets.add_group();
        widgets.add_member(group, Sleeper { group, ticks: 0 });

        assert!(!registry.install(widgets));
        assert!(registry.manager::<Sleeper>(ManagerKind::Gui).is_none());
        let kept = registry.dyn_manager(ManagerKind::Gui).unwrap();
        assert!(kept.get_group(old).is_some());
    }

    #[test]
    fn install_over_untouched_manager_keeps_epoch() {
        let mut registry = Registry::new();
        let mut items = Manager::<Sleeper>::new(ManagerKind::Item);
        let group = items.add_group();

        assert!(registry.install(items));
        let items = registry.manager::<Sleeper>(ManagerKind::Item).unwrap();
        assert_eq!(items.epoch(), 0);
        assert!(items.get_group(group).is_some());
    }

    #[test]
    fn object_requests_apply_after_phase() {
        let mut registry = Registry::new();
        registry.install(Manager::<Sleeper>::new(ManagerKind::Entity));

        let entities = registry.manager_mut::<Sleeper>(ManagerKind::Entity).unwrap();
        let group = entities.add_group();
        let a = entities.add_member(group, Sleeper { group, ticks: 0 }).unwrap();
        let b = entities.add_member(group, Sleeper { group, ticks: 0 }).unwrap();
        entities.open_group(group);

        registry.update_active();
        registry.update_active();

        // Both members ran in the first tick even though the first one
        // asked to close the group; the close landed at the boundary.
        let entities = registry.manager::<Sleeper>(ManagerKind::Entity).unwrap();
        assert!(!entities.is_group_open(group));
        assert_eq!(entities.get_member(a).unwrap().ticks, 1);
        assert_eq!(entities.get_member(b).unwrap().ticks, 1);
    }

    #[test]
    fn submitted_commands_apply_before_next_phase() {
        let trace: Trace = Arc::default();
        let mut registry = Registry::new();

        let manager = registry.dyn_manager_mut(ManagerKind::Item).unwrap();
        let group = manager.add_group();
        manager.add_member(
            group,
            Box::new(Tracer {
                kind: ManagerKind::Item,
                trace: Arc::clone(&trace),
            }),
        );

        registry.submit(GroupCommand::Open(group));
        assert_eq!(registry.active_group_count(), 0);

        registry.update_active();
        assert_eq!(registry.active_group_count(), 1);
        assert_eq!(trace.lock().unwrap().len(), 1);
    }

    #[test]
    fn flush_commands_applies_immediately() {
        let mut registry = Registry::new();
        let group = registry.dyn_manager_mut(ManagerKind::Gui).unwrap().add_group();

        registry.submit(GroupCommand::Open(group));
        registry.submit(GroupCommand::Open(group));
        assert_eq!(registry.flush_commands(), 1);
        assert_eq!(registry.active_group_count(), 1);
    }

    #[test]
    fn tick_runs_due_phases() {
        let trace: Trace = Arc::default();
        let mut registry = Registry::new();
        open_tracer(&mut registry, ManagerKind::Object, &trace);

        let start = Instant::now();
        let cadence = PhaseCadence::default()
            .with(Phase::Active, Duration::from_millis(10))
            .with(Phase::Mid, Duration::from_millis(20));
        let mut clock = PhaseClock::new(cadence, start);

        assert_eq!(registry.tick(&mut clock, start + Duration::from_millis(10)), 1);
        assert_eq!(registry.tick(&mut clock, start + Duration::from_millis(20)), 2);
        assert_eq!(registry.ticks(Phase::Active), 2);
        assert_eq!(registry.ticks(Phase::Mid), 1);
        assert_eq!(trace.lock().unwrap().len(), 3);
    }

    #[test]
    fn counters_aggregate_across_managers() {
        let trace: Trace = Arc::default();
        let mut registry = Registry::new();
        open_tracer(&mut registry, ManagerKind::Object, &trace);
        open_tracer(&mut registry, ManagerKind::Gui, &trace);
        registry.dyn_manager_mut(ManagerKind::Gui).unwrap().add_group();

        assert_eq!(registry.group_count(), 3);
        assert_eq!(registry.active_group_count(), 2);
        assert_eq!(registry.object_count(), 2);
        assert_eq!(registry.active_object_count(), 2);
    }
}
