//=========================================================================
// Tiered Scheduling
//=========================================================================
//
// Phase definitions and the clock that paces them.
//
// Flow:
//   PhaseClock::due(now) → [Phase] → Registry::run_phase(phase)
//
// All four cadences share one scheduling context, so phase dispatches
// never overlap and need no locking.
//
//=========================================================================

//=== Module Declarations =================================================

mod phase;
mod phase_clock;

//=== Public API ==========================================================

pub use phase::{Phase, PhaseCadence};
pub use phase_clock::PhaseClock;
