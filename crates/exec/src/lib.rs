//! Path execution: turns a computed path into per-tick control
//! inputs, one movement at a time, with recovery for lag teleports,
//! world edits, falls and unloaded terrain.

#![warn(missing_docs)]

mod executor;
mod movement;

pub use executor::{splice, ExecConfig, ExecStatus, FailureMode, PathExecutor};
pub use movement::{Movement, MovementStatus};
