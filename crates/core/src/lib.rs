#![warn(missing_docs)]
//! Core primitives shared across the navigation workspace.

mod agent;
mod error;
mod pos;

pub use agent::{AgentSnapshot, ControlInputs};
pub use error::NavError;
pub use pos::{BlockPos, CARDINALS, DIAGONALS};

use serde::{Deserialize, Serialize};

/// Fixed tick type (20 TPS => 50 ms per tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}
