//=========================================================================
// Control Collector
//=========================================================================
//
// Core-side receiver for control events, with bounded draining and
// shutdown detection.
//
// Architecture:
//   Receiver<ControlEvent> → collect_frame(wait) → events → TickControl
//
// collect_frame() blocks until the next phase deadline or the first
// event, whichever comes first, so the core thread sleeps while idle
// yet reacts to control events immediately.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::ControlEvent;

//=== TickControl =========================================================

/// Core loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== ControlCollector ====================================================

/// Collects control events for one loop iteration.
pub(crate) struct ControlCollector {
    receiver: Receiver<ControlEvent>,
    events: Vec<ControlEvent>,
}

impl ControlCollector {
    const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<ControlEvent>) -> Self {
        Self {
            receiver,
            events: Vec::with_capacity(8),
        }
    }

    /// Waits up to `wait` for control events, then drains what is queued.
    ///
    /// Returns `Exit` on shutdown or when every sender is gone.
    pub(crate) fn collect_frame(&mut self, wait: Duration) -> TickControl {
        self.events.clear();

        match self.receiver.recv_timeout(wait) {
            Ok(event) => {
                if self.handle_event(event) == TickControl::Exit {
                    return TickControl::Exit;
                }
            }
            Err(RecvTimeoutError::Timeout) => return TickControl::Continue,
            Err(RecvTimeoutError::Disconnected) => return TickControl::Exit,
        }

        let mut drained = 1;
        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!("Control queue backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Events collected by the last [`ControlCollector::collect_frame`].
    pub(crate) fn events(&self) -> &[ControlEvent] {
        &self.events
    }

    /// Takes the collected events, leaving the buffer empty.
    pub(crate) fn take_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }

    fn handle_event(&mut self, event: ControlEvent) -> TickControl {
        match event {
            ControlEvent::Shutdown => TickControl::Exit,
            other => {
                self.events.push(other);
                TickControl::Continue
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
