//=========================================================================
// Runtime Control
//=========================================================================
//
// Bridges application threads with the core thread that owns the
// registry.
//
// Components:
// - `interface`: ControlEvent and EngineError (the contract)
// - `control_collector`: core-side event collection and buffering
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod control_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use interface::{ControlEvent, EngineError};

//=== Internal API ========================================================

pub(crate) use control_collector::{ControlCollector, TickControl};
