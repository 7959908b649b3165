use crate::BlockPos;
use serde::{Deserialize, Serialize};

/// Point-in-time view of the agent the executor is driving.
///
/// Produced by the host each tick; the engine never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// World position (feet), floating point.
    pub pos: [f64; 3],
    /// Velocity in blocks per tick.
    pub velocity: [f64; 3],
    /// Whether the agent is standing on solid ground.
    pub on_ground: bool,
    /// Whether the agent's feet are in water.
    pub in_water: bool,
}

impl AgentSnapshot {
    /// Snapshot of an agent standing still at a block position.
    pub fn standing_at(pos: BlockPos) -> Self {
        let center = pos.center();
        Self {
            pos: center,
            velocity: [0.0; 3],
            on_ground: true,
            in_water: false,
        }
    }

    /// The block the agent's feet currently occupy.
    pub fn feet(&self) -> BlockPos {
        BlockPos::new(
            self.pos[0].floor() as i32,
            self.pos[1].floor() as i32,
            self.pos[2].floor() as i32,
        )
    }

    /// Squared horizontal distance from the agent to the center of a
    /// block.
    pub fn distance_sq_xz_to(&self, pos: BlockPos) -> f64 {
        let center = pos.center();
        let dx = self.pos[0] - center[0];
        let dz = self.pos[2] - center[2];
        dx * dx + dz * dz
    }

    /// Squared distance from the agent to the center of a block.
    pub fn distance_sq_to(&self, pos: BlockPos) -> f64 {
        let center = pos.center();
        let dx = self.pos[0] - center[0];
        let dy = self.pos[1] - center[1];
        let dz = self.pos[2] - center[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Control inputs a movement asks of the agent for one tick.
///
/// Cleared by the executor at the start of every tick; cancellation
/// clears them immediately.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlInputs {
    /// Move toward the look target this tick.
    pub forward: bool,
    /// Hold sprint while moving.
    pub sprint: bool,
    /// Initiate or hold a jump this tick.
    pub jump: bool,
    /// Swim upward / hold jump in water.
    pub swim_up: bool,
    /// World point to face, if any.
    pub look_at: Option<[f64; 3]>,
    /// Block to dig this tick, if any.
    pub dig_target: Option<BlockPos>,
    /// Block space to place a support block into, if any.
    pub place_target: Option<BlockPos>,
}

impl ControlInputs {
    /// Reset all inputs to their idle state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Face and move toward a world point.
    pub fn walk_toward(&mut self, target: [f64; 3]) {
        self.look_at = Some(target);
        self.forward = true;
    }
}
