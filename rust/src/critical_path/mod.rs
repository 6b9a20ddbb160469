//! Critical Path Method scheduling.
//!
//! `CpmEngine` orders the task graph topologically, runs a forward pass for
//! earliest start/finish and a backward pass for latest start/finish, then
//! picks out the zero-slack tasks.

mod calculation;
mod types;

pub use calculation::CpmEngine;
pub use types::{CpmAnalysis, CriticalPath};
