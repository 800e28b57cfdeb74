//=========================================================================
// Phasebound Engine
//
// Main entry point for driving a registry of managers.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  EngineHandle
//         │                          │                     │
//         ├─ with_cadence()          ├─ init()             ├─ open/close/toggle
//         ├─ with_channel_capacity() └─ step(now)          ├─ stop/start phase
//         └─ with_max_idle()                               └─ shutdown()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::control::{ControlEvent, EngineError};
use crate::core::handle::GroupHandle;
use crate::core::manager::GroupCommand;
use crate::core::registry::Registry;
use crate::core::schedule::{Phase, PhaseCadence, PhaseClock};
use crate::core::PhaseOrchestrator;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Cadences**: active 1/58 s, mid 1 s, slow 60 s, passive 3600 s
/// - **Channel capacity**: 128 events
/// - **Max idle**: 100 ms
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use phasebound::prelude::*;
///
/// let handle = EngineBuilder::new()
///     .with_active_hz(120.0)
///     .with_cadence(Phase::Mid, Duration::from_millis(500))
///     .with_channel_capacity(256)
///     .build()
///     .run();
///
/// handle.shutdown().unwrap();
/// ```
pub struct EngineBuilder {
    cadence: PhaseCadence,
    channel_capacity: usize,
    max_idle: Duration,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            cadence: PhaseCadence::default(),
            channel_capacity: 128,
            max_idle: Duration::from_millis(100),
        }
    }

    /// Sets the period of a single phase.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero or longer than [`PhaseCadence::MAX_PERIOD`].
    pub fn with_cadence(mut self, phase: Phase, period: Duration) -> Self {
        self.cadence = self.cadence.with(phase, period);
        self
    }

    /// Replaces every phase period at once.
    pub fn with_cadences(mut self, cadence: PhaseCadence) -> Self {
        self.cadence = cadence;
        self
    }

    /// Sets the active phase rate in ticks per second.
    ///
    /// Default: 58.0
    ///
    /// # Panics
    ///
    /// Panics if `hz <= 0.0` or the resulting period falls outside
    /// what [`PhaseCadence::with_active_hz`] accepts.
    pub fn with_active_hz(mut self, hz: f64) -> Self {
        self.cadence = self.cadence.with_active_hz(hz);
        self
    }

    /// Sets the channel capacity for control events into the core thread.
    ///
    /// Senders block once the channel is full, until the core thread
    /// catches up.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Caps how long the core thread sleeps between wakeups, even when
    /// every phase is stopped.
    ///
    /// Default: 100 ms
    ///
    /// # Panics
    ///
    /// Panics if `max_idle` is zero.
    pub fn with_max_idle(mut self, max_idle: Duration) -> Self {
        assert!(!max_idle.is_zero(), "Max idle must be positive");
        self.max_idle = max_idle;
        self
    }

    /// Builds the engine instance.
    ///
    /// Call [`Engine::init`] to populate the registry, then either
    /// [`Engine::run`] it on a core thread or drive it with [`Engine::step`].
    pub fn build(self) -> Engine {
        info!(
            "Building engine (active: {:?}, channel: {}, max idle: {:?})",
            self.cadence.period(Phase::Active),
            self.channel_capacity,
            self.max_idle
        );

        Engine {
            orchestrator: PhaseOrchestrator::new(self.cadence, self.max_idle),
            channel_capacity: self.channel_capacity,
            clock: None,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Phasebound runtime before it starts.
///
/// # Architecture
///
/// ```text
/// Engine (Caller Thread)
///   ├─► init(|registry| ..)        populate managers and groups
///   │
///   ├─► step(now)                  manual drive from the caller's loop
///   │
///   └─► run() ─► PhaseOrchestrator (Core Thread)
///                  └─► Registry: active / mid / slow / passive
///
/// Communication: bounded crossbeam channel (ControlEvent)
/// ```
pub struct Engine {
    orchestrator: PhaseOrchestrator,
    channel_capacity: usize,
    clock: Option<PhaseClock>,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Populates the registry before execution.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use phasebound::prelude::*;
    /// struct Torch;
    /// impl GameObject for Torch {
    ///     fn update_active(&mut self, _ctx: &mut TickContext) {}
    /// }
    ///
    /// let handle = EngineBuilder::new()
    ///     .build()
    ///     .init(|registry| {
    ///         let effects = registry.dyn_manager_mut(ManagerKind::Effect).unwrap();
    ///         let torches = effects.add_named_group("torches");
    ///         effects.add_member(torches, Box::new(Torch));
    ///         effects.open_group(torches);
    ///     })
    ///     .run();
    /// # handle.shutdown().unwrap();
    /// ```
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut Registry),
    {
        info!("Initializing registry");

        self.orchestrator.init_systems(init_fn);

        info!("Registry initialization complete");
        self
    }

    pub fn registry(&self) -> &Registry {
        self.orchestrator.registry()
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        self.orchestrator.registry_mut()
    }

    //--- Manual Drive -----------------------------------------------------

    /// Runs every phase due at `now` on the calling thread.
    ///
    /// The phase clock starts at the first call, so that call never runs
    /// anything. Returns how many phases ran.
    pub fn step(&mut self, now: Instant) -> usize {
        let cadence = *self.orchestrator.cadence();
        let clock = self.clock.get_or_insert_with(|| PhaseClock::new(cadence, now));
        self.orchestrator.registry_mut().tick(clock, now)
    }

    //--- Execution --------------------------------------------------------

    /// Moves the registry onto a core thread and starts ticking.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the bounded control channel
    /// 2. Spawns the core thread, which owns the registry from here on
    /// 3. Returns an [`EngineHandle`] for control and shutdown
    ///
    /// Dropping the handle without calling [`EngineHandle::shutdown`]
    /// stops the core thread once the channel disconnects, which only
    /// happens after every sender cloned through [`EngineHandle::sender`]
    /// is dropped too.
    pub fn run(self) -> EngineHandle {
        info!("Starting engine runtime");

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<ControlEvent>, Receiver<ControlEvent>) =
            bounded(self.channel_capacity);

        info!("Control channel created (capacity: {})", self.channel_capacity);

        //--- 2. Spawn the core thread -------------------------------------
        let core = self.orchestrator.spawn_core_thread(rx);
        info!("Core thread spawned");

        EngineHandle { sender: tx, core }
    }
}

//=== EngineHandle ========================================================

/// Control surface for a running engine.
///
/// Every method sends a [`ControlEvent`]; group commands take effect at
/// the core thread's next tick boundary.
pub struct EngineHandle {
    sender: Sender<ControlEvent>,
    core: JoinHandle<Registry>,
}

impl EngineHandle {
    /// Sends a raw control event to the core thread.
    pub fn send(&self, event: ControlEvent) -> Result<(), EngineError> {
        self.sender.send(event).map_err(|_| EngineError::ChannelClosed)
    }

    /// Sender that other threads can clone to reach the core thread.
    pub fn sender(&self) -> Sender<ControlEvent> {
        self.sender.clone()
    }

    pub fn open_group(&self, group: GroupHandle) -> Result<(), EngineError> {
        self.send(ControlEvent::Group(GroupCommand::Open(group)))
    }

    pub fn close_group(&self, group: GroupHandle) -> Result<(), EngineError> {
        self.send(ControlEvent::Group(GroupCommand::Close(group)))
    }

    pub fn toggle_group(&self, group: GroupHandle) -> Result<(), EngineError> {
        self.send(ControlEvent::Group(GroupCommand::Toggle(group)))
    }

    pub fn stop_phase(&self, phase: Phase) -> Result<(), EngineError> {
        self.send(ControlEvent::StopPhase(phase))
    }

    pub fn start_phase(&self, phase: Phase) -> Result<(), EngineError> {
        self.send(ControlEvent::StartPhase(phase))
    }

    /// True once the core thread has exited.
    pub fn is_finished(&self) -> bool {
        self.core.is_finished()
    }

    /// Stops the core thread and hands back the registry.
    ///
    /// A core thread that already exited is not an error; its registry
    /// is still returned.
    pub fn shutdown(self) -> Result<Registry, EngineError> {
        info!("Shutting down engine");

        // The core thread may already be gone, in which case join() reports it
        let _ = self.sender.send(ControlEvent::Shutdown);
        drop(self.sender);

        match self.core.join() {
            Ok(registry) => {
                info!("Core thread terminated cleanly");
                Ok(registry)
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("Core thread panicked: {}", message);
                Err(EngineError::CoreThreadPanicked(message))
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::group::GameObject;
    use crate::core::handle::ManagerKind;
    use crate::core::TickContext;

    struct Ticker;

    impl GameObject for Ticker {
        fn update_active(&mut self, _ctx: &mut TickContext) {}
    }

    struct Bomb;

    impl GameObject for Bomb {
        fn update_active(&mut self, _ctx: &mut TickContext) {
            panic!("bomb went off");
        }
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.cadence, PhaseCadence::default());
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.max_idle, Duration::from_millis(100));
    }

    #[test]
    fn builder_with_cadence() {
        let builder = EngineBuilder::new().with_cadence(Phase::Slow, Duration::from_secs(5));
        assert_eq!(builder.cadence.period(Phase::Slow), Duration::from_secs(5));
        assert_eq!(builder.cadence.period(Phase::Mid), Duration::from_secs(1));
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn builder_with_cadence_panics_on_zero() {
        EngineBuilder::new().with_cadence(Phase::Mid, Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "Active rate must be positive")]
    fn builder_with_active_hz_panics_on_negative() {
        EngineBuilder::new().with_active_hz(-60.0);
    }

    #[test]
    fn builder_with_channel_capacity() {
        let builder = EngineBuilder::new().with_channel_capacity(256);
        assert_eq!(builder.channel_capacity, 256);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Max idle must be positive")]
    fn builder_with_max_idle_panics_on_zero() {
        EngineBuilder::new().with_max_idle(Duration::ZERO);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_active_hz(120.0)
            .with_channel_capacity(256)
            .build();

        assert_eq!(engine.channel_capacity, 256);
        assert_eq!(
            engine.orchestrator.cadence().period(Phase::Active),
            Duration::from_secs_f64(1.0 / 120.0)
        );
    }

    //=====================================================================
    // Engine Tests
    //=====================================================================

    #[test]
    fn step_first_call_arms_clock() {
        let mut engine = EngineBuilder::new().build();
        let start = Instant::now();

        assert_eq!(engine.step(start), 0);
        assert_eq!(engine.step(start + Duration::from_secs(1)), 2);
        assert_eq!(engine.registry().ticks(Phase::Active), 1);
        assert_eq!(engine.registry().ticks(Phase::Mid), 1);
    }

    #[test]
    fn run_and_shutdown_returns_registry() {
        let handle = EngineBuilder::new()
            .with_active_hz(500.0)
            .build()
            .init(|registry| {
                let objects = registry.dyn_manager_mut(ManagerKind::Object).unwrap();
                let group = objects.add_group();
                objects.add_member(group, Box::new(Ticker));
            })
            .run();

        let registry = handle.shutdown().unwrap();
        assert_eq!(registry.object_count(), 1);
    }

    #[test]
    fn shutdown_reports_core_panic() {
        let handle = EngineBuilder::new()
            .with_active_hz(500.0)
            .build()
            .init(|registry| {
                let objects = registry.dyn_manager_mut(ManagerKind::Object).unwrap();
                let group = objects.add_group();
                objects.add_member(group, Box::new(Bomb));
                objects.open_group(group);
            })
            .run();

        while !handle.is_finished() {
            std::thread::sleep(Duration::from_millis(1));
        }

        assert!(handle.open_group(GroupHandle::new(ManagerKind::Object, 0, 0)).is_err());
        match handle.shutdown() {
            Err(EngineError::CoreThreadPanicked(message)) => assert!(message.contains("bomb")),
            other => panic!("expected panic error, got {:?}", other.map(|_| ())),
        }
    }
}
