//=========================================================================
// Core Systems Orchestrator
//
// Drives the registry from a dedicated core thread.
//
// Responsibilities:
// - Own the registry for the lifetime of the run
// - Receive control events from other threads via a crossbeam channel
// - Fire the four update phases at their own cadences
//
// Notes:
// The core thread is the only thread that touches game objects. Other
// threads talk to it purely through ControlEvent messages, and group
// commands they send take effect at the next tick boundary.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================
use crossbeam_channel::Receiver;
use log::{debug, info};

//=== Module Declarations =================================================

pub mod control;
pub mod group;
pub mod handle;
pub mod manager;
pub mod registry;
pub mod schedule;
mod tick_context;

//=== Public API ==========================================================

pub use tick_context::TickContext;

//=== Internal Modules ====================================================
use control::{ControlCollector, ControlEvent, TickControl};
use registry::Registry;
use schedule::{PhaseCadence, PhaseClock};

//=== PhaseOrchestrator ===================================================
//
// Owns the registry until the core thread is spawned, then hands it to
// that thread. The thread returns the registry when it exits so callers
// can inspect the final state.
//
pub(crate) struct PhaseOrchestrator {
    registry: Registry,
    cadence: PhaseCadence,
    max_idle: Duration,
}

impl PhaseOrchestrator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(cadence: PhaseCadence, max_idle: Duration) -> Self {
        Self {
            registry: Registry::new(),
            cadence,
            max_idle,
        }
    }

    //--- Initialization ---------------------------------------------------

    pub(crate) fn init_systems<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut Registry),
    {
        init_fn(&mut self.registry);
        debug!(
            "Registry initialized ({} groups, {} objects)",
            self.registry.group_count(),
            self.registry.object_count()
        );
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub(crate) fn cadence(&self) -> &PhaseCadence {
        &self.cadence
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Spawns the core thread. Each iteration:
    //  1. Waits for the next phase deadline or a control event
    //  2. Applies control events (group commands, phase start/stop)
    //  3. Runs every phase that is due
    //  4. Exits on shutdown or when every sender is gone
    //
    pub(crate) fn spawn_core_thread(
        self,
        receiver: Receiver<ControlEvent>,
    ) -> thread::JoinHandle<Registry> {
        thread::spawn(move || {
            let mut registry = self.registry;
            let mut clock = PhaseClock::new(self.cadence, Instant::now());
            let mut collector = ControlCollector::new(receiver);

            loop {
                //--- Step 1: Wait for the next deadline or event ---------
                let wait = clock
                    .time_until_next(Instant::now())
                    .map_or(self.max_idle, |until| until.min(self.max_idle));

                if let TickControl::Exit = collector.collect_frame(wait) {
                    info!(
                        "Core thread exiting after {} active ticks",
                        registry.ticks(schedule::Phase::Active)
                    );
                    break;
                }

                //--- Step 2: Apply control events -------------------------
                let now = Instant::now();
                if !collector.events().is_empty() {
                    debug!("Applying {} control event(s)", collector.events().len());
                }
                for event in collector.take_events() {
                    Self::apply_event(&mut registry, &mut clock, event, now);
                }

                //--- Step 3: Run due phases -------------------------------
                registry.tick(&mut clock, Instant::now());
            }

            registry
        })
    }

    fn apply_event(registry: &mut Registry, clock: &mut PhaseClock, event: ControlEvent, now: Instant) {
        match event {
            ControlEvent::Group(command) => registry.submit(command),
            ControlEvent::StopPhase(phase) => clock.stop(phase),
            ControlEvent::StartPhase(phase) => clock.start(phase, now),
            // Consumed by the collector
            ControlEvent::Shutdown => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    use crate::core::group::GameObject;
    use crate::core::handle::ManagerKind;
    use crate::core::manager::GroupCommand;
    use crate::core::schedule::Phase;

    struct Spinner;

    impl GameObject for Spinner {
        fn update_active(&mut self, _ctx: &mut TickContext) {}
    }

    fn fast_cadence() -> PhaseCadence {
        PhaseCadence::default().with(Phase::Active, Duration::from_millis(1))
    }

    #[test]
    fn init_systems_runs_closure_against_registry() {
        let mut orchestrator = PhaseOrchestrator::new(PhaseCadence::default(), Duration::from_millis(10));
        orchestrator.init_systems(|registry| {
            let objects = registry.dyn_manager_mut(ManagerKind::Object).unwrap();
            let group = objects.add_group();
            objects.add_member(group, Box::new(Spinner)).unwrap();
        });

        assert_eq!(orchestrator.registry().group_count(), 1);
        assert_eq!(orchestrator.registry().object_count(), 1);
    }

    #[test]
    fn core_thread_exits_on_shutdown_and_returns_registry() {
        let orchestrator = PhaseOrchestrator::new(fast_cadence(), Duration::from_millis(5));
        let (tx, rx) = unbounded();

        let handle = orchestrator.spawn_core_thread(rx);
        tx.send(ControlEvent::Shutdown).unwrap();

        let registry = handle.join().unwrap();
        assert_eq!(registry.group_count(), 0);
    }

    #[test]
    fn core_thread_exits_when_senders_drop() {
        let orchestrator = PhaseOrchestrator::new(fast_cadence(), Duration::from_millis(5));
        let (tx, rx) = unbounded::<ControlEvent>();

        let handle = orchestrator.spawn_core_thread(rx);
        drop(tx);

        assert!(handle.join().is_ok());
    }

    #[test]
    fn core_thread_outlives_dropped_sender_while_a_clone_remains() {
        let orchestrator = PhaseOrchestrator::new(fast_cadence(), Duration::from_millis(5));
        let (tx, rx) = unbounded::<ControlEvent>();
        let clone = tx.clone();

        let handle = orchestrator.spawn_core_thread(rx);
        drop(tx);
        std::thread::sleep(Duration::from_millis(30));
        assert!(!handle.is_finished());

        drop(clone);
        assert!(handle.join().is_ok());
    }

    #[test]
    fn core_thread_applies_group_commands() {
        let mut orchestrator = PhaseOrchestrator::new(fast_cadence(), Duration::from_millis(5));
        let mut group = None;
        orchestrator.init_systems(|registry| {
            let objects = registry.dyn_manager_mut(ManagerKind::Object).unwrap();
            let handle = objects.add_group();
            objects.add_member(handle, Box::new(Spinner)).unwrap();
            group = Some(handle);
        });
        let group = group.unwrap();

        let (tx, rx) = unbounded();
        let handle = orchestrator.spawn_core_thread(rx);

        tx.send(ControlEvent::Group(GroupCommand::Open(group))).unwrap();
        std::thread::sleep(Duration::from_millis(30));
        tx.send(ControlEvent::Shutdown).unwrap();

        let registry = handle.join().unwrap();
        let objects = registry.dyn_manager(ManagerKind::Object).unwrap();
        assert!(objects.is_group_open(group));
        assert!(registry.ticks(Phase::Active) > 0);
    }
}
