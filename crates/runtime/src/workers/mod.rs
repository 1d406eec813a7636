//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker is the single owner of match state; everything else
//! talks to it through [`Command`]s.

mod simulation;

pub use simulation::{Collaborators, Command, SimulationWorker};
