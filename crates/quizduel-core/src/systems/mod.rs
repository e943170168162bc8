//! Systems - logic that operates on components

mod commentary;
mod results;
mod scheduler;
mod simulation;

pub use commentary::*;
pub use results::*;
pub use scheduler::*;
pub use simulation::*;
