//=========================================================================
// Phase Clock
//=========================================================================
//
// Multiplexes the four phase cadences onto one scheduling context.
//
// State per phase:  armed(next_due) ──now >= next_due──> fire ──> armed
//
// A phase that falls more than one period behind fires once and re-arms
// relative to `now`; missed ticks are dropped and counted.
//
// Time is always passed in, so the clock is deterministic under test.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Phase, PhaseCadence};

//=== PhaseClock ==========================================================

/// Decides which phases are due at a given instant.
#[derive(Debug, Clone)]
pub struct PhaseClock {
    cadence: PhaseCadence,
    next_due: [Instant; 4],
    enabled: [bool; 4],
    fired: [u64; 4],
    skipped: [u64; 4],
}

impl PhaseClock {
    /// Creates a clock with every phase armed one period after `start`.
    pub fn new(cadence: PhaseCadence, start: Instant) -> Self {
        let next_due = Phase::ALL.map(|phase| start + cadence.period(phase));
        Self {
            cadence,
            next_due,
            enabled: [true; 4],
            fired: [0; 4],
            skipped: [0; 4],
        }
    }

    pub fn cadence(&self) -> &PhaseCadence {
        &self.cadence
    }

    //--- Polling ----------------------------------------------------------

    /// Returns the phases due at `now`, in dispatch order, and re-arms them.
    pub fn due(&mut self, now: Instant) -> Vec<Phase> {
        let mut phases = Vec::with_capacity(Phase::ALL.len());
        self.collect_due(now, &mut phases);
        phases
    }

    /// Buffer-reusing variant of [`PhaseClock::due`].
    pub fn collect_due(&mut self, now: Instant, out: &mut Vec<Phase>) {
        out.clear();

        for phase in Phase::ALL {
            let i = phase.index();
            if !self.enabled[i] || now < self.next_due[i] {
                continue;
            }

            out.push(phase);
            self.fired[i] += 1;

            let period = self.cadence.period(phase);
            let next = self.next_due[i] + period;
            if next <= now {
                let behind = now.duration_since(self.next_due[i]);
                let missed = (behind.as_nanos() / period.as_nanos().max(1)) as u64;
                self.skipped[i] += missed;
                debug!("Phase {} fell behind, skipped {} tick(s)", phase, missed);
                self.next_due[i] = now + period;
            } else {
                self.next_due[i] = next;
            }
        }
    }

    /// Earliest deadline among enabled phases, if any are enabled.
    pub fn next_deadline(&self) -> Option<Instant> {
        Phase::ALL
            .iter()
            .filter(|phase| self.enabled[phase.index()])
            .map(|phase| self.next_due[phase.index()])
            .min()
    }

    /// Time left until [`PhaseClock::next_deadline`], zero if already due.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    //--- Phase Control ----------------------------------------------------

    /// Stops a phase. It will not be reported as due until restarted.
    pub fn stop(&mut self, phase: Phase) {
        if self.enabled[phase.index()] {
            debug!("Stopping phase {}", phase);
        }
        self.enabled[phase.index()] = false;
    }

    /// Restarts a stopped phase, arming it one period after `now`.
    pub fn start(&mut self, phase: Phase, now: Instant) {
        let i = phase.index();
        if self.enabled[i] {
            return;
        }
        debug!("Starting phase {}", phase);
        self.enabled[i] = true;
        self.next_due[i] = now + self.cadence.period(phase);
    }

    pub fn is_enabled(&self, phase: Phase) -> bool {
        self.enabled[phase.index()]
    }

    //--- Statistics -------------------------------------------------------

    /// Number of times `phase` has fired.
    pub fn fired(&self, phase: Phase) -> u64 {
        self.fired[phase.index()]
    }

    /// Number of ticks of `phase` dropped because it fell behind.
    pub fn skipped(&self, phase: Phase) -> u64 {
        self.skipped[phase.index()]
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
