//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the combat state and executes every command
//! against it.

mod simulation;

pub use simulation::{AutoTick, Command, SimulationWorker};
