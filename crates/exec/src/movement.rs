//! Per-kind movement state machines.
//!
//! One [`Movement`] realizes one path edge: it orients the agent,
//! clears obstructions, places support, initiates jumps and detects
//! arrival, emitting [`ControlInputs`] each tick. Dispatch over the
//! edge kind is a plain match; the sub-step progression lives in a
//! small internal phase enum.

use serde::{Deserialize, Serialize};
use voxelnav_core::{AgentSnapshot, BlockPos, ControlInputs};
use voxelnav_search::{
    walk_estimate, MoveKind, PathNode, JUMP_ONE_BLOCK_COST, PLACE_ONE_BLOCK_COST,
};
use voxelnav_world::WorldView;

/// Squared horizontal distance at which a destination counts as
/// reached.
const ARRIVAL_DIST_SQ: f64 = 0.09;

/// How close (squared) the agent must get to the takeoff edge before
/// a parkour jump fires.
const TAKEOFF_DIST_SQ: f64 = 0.25;

/// Outcome of one movement tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementStatus {
    /// Actively progressing toward the destination.
    Running,
    /// Blocked on slow work (breaking a block) but not stuck.
    Waiting,
    /// The destination was reached.
    Success,
    /// The movement cannot continue from the current state.
    Failed,
    /// The movement can never complete (unbreakable obstruction).
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Orienting,
    Breaking,
    Moving,
    Falling,
}

/// State machine driving the agent along one path edge.
#[derive(Debug, Clone)]
pub struct Movement {
    from: BlockPos,
    node: PathNode,
    phase: Phase,
}

impl Movement {
    /// A movement from `from` into the path node's position.
    pub fn new(from: BlockPos, node: PathNode) -> Self {
        Self {
            from,
            node,
            phase: Phase::Orienting,
        }
    }

    /// Origin feet position.
    pub fn from(&self) -> BlockPos {
        self.from
    }

    /// Destination feet position.
    pub fn dest(&self) -> BlockPos {
        self.node.pos
    }

    /// The edge kind this movement realizes.
    pub fn kind(&self) -> MoveKind {
        self.node.kind
    }

    /// Restart the movement from its initial sub-step.
    pub fn reset(&mut self) {
        self.phase = Phase::Orienting;
    }

    /// Whether the agent, already falling through this movement, may
    /// skip its discrete execution. True for descending kinds and for
    /// movements confined to the origin's vertical column.
    pub fn can_accept_fall(&self) -> bool {
        self.node.kind.is_falling() || (self.from.x == self.dest().x && self.from.z == self.dest().z)
    }

    /// Whether the movement has entered its falling sub-state, which
    /// is what arms the executor's fall override.
    pub fn is_falling_phase(&self) -> bool {
        self.phase == Phase::Falling
    }

    /// Obstructions this movement still has to clear.
    pub fn to_break(&self) -> &[BlockPos] {
        &self.node.to_break
    }

    /// Estimated ticks to complete, used for the executor's
    /// per-movement timeout.
    pub fn cost_estimate<W: WorldView>(&self, world: &W) -> f64 {
        let mut estimate = walk_estimate(self.from, self.dest()) + JUMP_ONE_BLOCK_COST;
        for block in &self.node.to_break {
            let ticks = world.break_ticks(*block);
            if ticks.is_finite() {
                estimate += ticks;
            }
        }
        estimate += self.node.to_place.len() as f64 * PLACE_ONE_BLOCK_COST;
        estimate
    }

    /// Advance the movement by one tick, writing the controls the
    /// agent should apply.
    pub fn tick<W: WorldView>(
        &mut self,
        world: &W,
        agent: &AgentSnapshot,
        controls: &mut ControlInputs,
    ) -> MovementStatus {
        match self.phase {
            Phase::Orienting => {
                controls.look_at = Some(self.dest().center());
                self.phase = if self.node.to_break.is_empty() {
                    Phase::Moving
                } else {
                    Phase::Breaking
                };
                MovementStatus::Running
            }
            Phase::Breaking => self.tick_breaking(world, controls),
            Phase::Moving => self.tick_moving(world, agent, controls),
            Phase::Falling => self.tick_falling(agent, controls),
        }
    }

    fn tick_breaking<W: WorldView>(
        &mut self,
        world: &W,
        controls: &mut ControlInputs,
    ) -> MovementStatus {
        for block in &self.node.to_break {
            if world.can_walk_through(*block) {
                continue;
            }
            if !world.break_ticks(*block).is_finite() {
                tracing::warn!(block = ?block, "obstruction cannot be broken");
                return MovementStatus::Unreachable;
            }
            controls.look_at = Some(block.center());
            controls.dig_target = Some(*block);
            return MovementStatus::Waiting;
        }
        self.phase = Phase::Moving;
        MovementStatus::Running
    }

    fn tick_moving<W: WorldView>(
        &mut self,
        world: &W,
        agent: &AgentSnapshot,
        controls: &mut ControlInputs,
    ) -> MovementStatus {
        let dest = self.dest();
        if self.arrived(agent) {
            return MovementStatus::Success;
        }
        match self.node.kind {
            MoveKind::Traverse | MoveKind::Diagonal | MoveKind::Door | MoveKind::EnterWater => {
                controls.walk_toward(dest.center());
            }
            MoveKind::Ascend => {
                controls.walk_toward(dest.center());
                controls.jump = agent.on_ground && agent.feet().y < dest.y;
            }
            MoveKind::Descend | MoveKind::Fall => {
                controls.walk_toward(dest.center());
                if !agent.on_ground && !agent.in_water {
                    self.phase = Phase::Falling;
                }
            }
            MoveKind::Parkour => {
                controls.walk_toward(dest.center());
                controls.sprint = true;
                // Jump at the platform edge, not before.
                controls.jump =
                    agent.on_ground && agent.distance_sq_xz_to(self.from) >= TAKEOFF_DIST_SQ;
                if !agent.on_ground {
                    self.phase = Phase::Falling;
                }
            }
            MoveKind::Pillar => {
                controls.look_at = Some(self.from.center());
                controls.jump = true;
                if !agent.on_ground {
                    if let Some(target) = self.node.to_place.first() {
                        if world.can_walk_through(*target) {
                            controls.place_target = Some(*target);
                        }
                    }
                }
            }
            MoveKind::Climb => {
                controls.look_at = Some(dest.center());
                if dest.y > self.from.y {
                    controls.jump = true;
                } else {
                    controls.forward = false;
                }
            }
            MoveKind::MineDown => {
                // The dig happened in the breaking phase; ride the
                // drop down.
                controls.look_at = Some(dest.center());
                if !agent.on_ground {
                    self.phase = Phase::Falling;
                }
            }
            MoveKind::Swim | MoveKind::SwimDown => {
                controls.walk_toward(dest.center());
            }
            MoveKind::SwimUp => {
                controls.look_at = Some(dest.center());
                controls.swim_up = true;
            }
            MoveKind::ExitWater => {
                controls.walk_toward(dest.center());
                controls.swim_up = dest.y > self.from.y;
                controls.jump = dest.y > self.from.y;
            }
        }
        MovementStatus::Running
    }

    fn tick_falling(&mut self, agent: &AgentSnapshot, controls: &mut ControlInputs) -> MovementStatus {
        let dest = self.dest();
        controls.walk_toward(dest.center());
        if let Some(target) = self.node.to_place.first() {
            // Water-bucket landing: deploy shortly above the target.
            if agent.pos[1] - target.y as f64 <= 3.0 {
                controls.place_target = Some(*target);
            }
        }
        if agent.on_ground || agent.in_water {
            if self.arrived(agent) {
                MovementStatus::Success
            } else {
                MovementStatus::Failed
            }
        } else {
            MovementStatus::Running
        }
    }

    fn arrived(&self, agent: &AgentSnapshot) -> bool {
        let dest = self.dest();
        if agent.feet() != dest {
            return false;
        }
        if agent.distance_sq_xz_to(dest) > ARRIVAL_DIST_SQ {
            return false;
        }
        match self.node.kind {
            MoveKind::Swim
            | MoveKind::SwimUp
            | MoveKind::SwimDown
            | MoveKind::EnterWater => true,
            MoveKind::Climb => true,
            _ => agent.on_ground || agent.in_water,
        }
    }
}
