//=========================================================================
// Phasebound Library Root
//
// Lifecycle manager for game objects: typed managers hold groups of
// objects, and a four-phase scheduler updates only the groups that are
// currently open.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`, `EngineHandle`)
// - Expose the building blocks under `core` for manual driving
//
// Typical usage:
// ```no_run
// use phasebound::prelude::*;
//
// fn main() {
//     let handle = EngineBuilder::new().build().run();
//     handle.shutdown().unwrap();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains handles, groups, managers, the registry and the phase
// scheduler. Applications that drive ticks themselves use it directly.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the builder, the runtime and its control handle.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineHandle};
