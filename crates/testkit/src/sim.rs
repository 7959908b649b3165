//! Kinematic agent simulator.
//!
//! Applies one tick of [`ControlInputs`] to an [`AgentSnapshot`]
//! against a [`VoxelWorld`], with just enough physics (gravity, jump
//! impulse, block collision, water buoyancy, ladders) to let the
//! path executor's state machines run to completion headlessly.
//! Digging and placing resolve instantly; movement state machines
//! supply their own timing on top.

use voxelnav_core::{AgentSnapshot, BlockPos, ControlInputs};
use voxelnav_world::{BlockUpdateTracker, VoxelWorld, WorldView, BLOCK_AIR, BLOCK_COBBLESTONE};

/// Blocks per tick while walking.
pub const WALK_SPEED: f64 = 4.317 / 20.0;
/// Blocks per tick while sprinting.
pub const SPRINT_SPEED: f64 = 5.612 / 20.0;
/// Blocks per tick while swimming.
pub const SWIM_SPEED: f64 = 2.2 / 20.0;
/// Blocks per tick climbing up a ladder.
pub const CLIMB_SPEED: f64 = 2.35 / 20.0;
/// Initial vertical velocity of a jump, blocks per tick.
pub const JUMP_VELOCITY: f64 = 0.42;
/// Gravity acceleration, blocks per tick squared.
pub const GRAVITY: f64 = 0.0784;
/// Terminal fall velocity, blocks per tick.
pub const TERMINAL_VELOCITY: f64 = 3.92;

/// A simulated agent with deterministic, simplified physics.
#[derive(Debug, Clone)]
pub struct SimAgent {
    /// Current kinematic state; readable by the executor every tick.
    pub snapshot: AgentSnapshot,
    /// Block mutations made by this agent, for hosts that feed them
    /// back into the executor's world-change watcher.
    pub updates: BlockUpdateTracker,
}

impl SimAgent {
    /// An agent standing still with its feet at `pos`.
    pub fn standing_at(pos: BlockPos) -> Self {
        Self {
            snapshot: AgentSnapshot::standing_at(pos),
            updates: BlockUpdateTracker::new(),
        }
    }

    /// Advance the agent by one tick under `controls`.
    pub fn step(&mut self, world: &mut VoxelWorld, controls: &ControlInputs) {
        // Block interactions resolve instantly; the movement state
        // machines meter out their own break/place timing.
        if let Some(target) = controls.dig_target {
            world.set_block_tracked(target, BLOCK_AIR, &mut self.updates);
        }
        if let Some(target) = controls.place_target {
            if world.can_walk_through(target) {
                world.set_block_tracked(target, BLOCK_COBBLESTONE, &mut self.updates);
            }
        }

        self.horizontal(world, controls);
        self.vertical(world, controls);
        self.refresh_flags(world);
    }

    fn horizontal(&mut self, world: &VoxelWorld, controls: &ControlInputs) {
        let snap = &mut self.snapshot;
        let (Some(look), true) = (controls.look_at, controls.forward) else {
            snap.velocity[0] = 0.0;
            snap.velocity[2] = 0.0;
            return;
        };
        let dx = look[0] - snap.pos[0];
        let dz = look[2] - snap.pos[2];
        let dist = (dx * dx + dz * dz).sqrt();
        if dist < 1e-9 {
            return;
        }
        let speed = if snap.in_water {
            SWIM_SPEED
        } else if controls.sprint {
            SPRINT_SPEED
        } else {
            WALK_SPEED
        };
        let advance = speed.min(dist);
        let next_x = snap.pos[0] + dx / dist * advance;
        let next_z = snap.pos[2] + dz / dist * advance;
        let feet = BlockPos::new(
            next_x.floor() as i32,
            snap.pos[1].floor() as i32,
            next_z.floor() as i32,
        );
        // Whole-body collision: the move lands only if both body
        // blocks at the destination column are enterable.
        if world.is_body_clear(feet) || world.is_water(feet) {
            snap.pos[0] = next_x;
            snap.pos[2] = next_z;
            snap.velocity[0] = dx / dist * advance;
            snap.velocity[2] = dz / dist * advance;
        } else {
            snap.velocity[0] = 0.0;
            snap.velocity[2] = 0.0;
        }
    }

    fn vertical(&mut self, world: &VoxelWorld, controls: &ControlInputs) {
        let snap = &mut self.snapshot;
        let feet = snap.feet();

        if snap.in_water {
            snap.velocity[1] = if controls.swim_up || controls.jump {
                SWIM_SPEED
            } else {
                -SWIM_SPEED / 2.0
            };
            let next_y = snap.pos[1] + snap.velocity[1];
            let next_feet = BlockPos::new(feet.x, next_y.floor() as i32, feet.z);
            if world.can_walk_through(next_feet) || world.is_water(next_feet) {
                snap.pos[1] = next_y;
            } else {
                snap.velocity[1] = 0.0;
            }
            return;
        }

        if world.is_climbable(feet) {
            snap.velocity[1] = if controls.jump || controls.forward {
                CLIMB_SPEED
            } else {
                -CLIMB_SPEED
            };
            let next_y = snap.pos[1] + snap.velocity[1];
            let next_feet = BlockPos::new(feet.x, next_y.floor() as i32, feet.z);
            if world.can_walk_through(next_feet) {
                snap.pos[1] = next_y;
            } else if snap.velocity[1] < 0.0 {
                // Landed on the block below the ladder.
                snap.pos[1] = feet.y as f64;
                snap.velocity[1] = 0.0;
            } else {
                snap.velocity[1] = 0.0;
            }
            return;
        }

        if snap.on_ground && controls.jump {
            snap.velocity[1] = JUMP_VELOCITY;
            snap.on_ground = false;
        }
        // Move with the current velocity, then accelerate; this gives
        // a jump apex of ~1.3 blocks, enough to clear one step.
        let vy = snap.velocity[1];
        let next_y = snap.pos[1] + vy;
        if vy <= 0.0 {
            let next_feet = BlockPos::new(feet.x, next_y.floor() as i32, feet.z);
            if !world.can_walk_through(next_feet) && !world.is_water(next_feet) {
                // Land on top of the obstruction.
                snap.pos[1] = (next_feet.y + 1) as f64;
                snap.velocity[1] = 0.0;
                snap.on_ground = true;
                return;
            }
        }
        snap.pos[1] = next_y;
        if !snap.on_ground {
            snap.velocity[1] = (vy - GRAVITY).max(-TERMINAL_VELOCITY);
        }
    }

    fn refresh_flags(&mut self, world: &VoxelWorld) {
        let snap = &mut self.snapshot;
        let feet = snap.feet();
        snap.in_water = world.is_water(feet);
        if snap.in_water {
            snap.on_ground = false;
        } else {
            let fractional = snap.pos[1] - snap.pos[1].floor();
            snap.on_ground =
                fractional < 1e-6 && !world.can_walk_through(feet.down()) && snap.velocity[1] <= 0.0;
        }
    }
}

/// Step an agent until `done` returns true or `max_ticks` elapse,
/// driving controls from `control` each tick. Returns the tick count
/// consumed, or `None` when the budget ran out.
pub fn run_until<C, D>(
    world: &mut VoxelWorld,
    agent: &mut SimAgent,
    max_ticks: u64,
    mut control: C,
    mut done: D,
) -> Option<u64>
where
    C: FnMut(&AgentSnapshot) -> ControlInputs,
    D: FnMut(&AgentSnapshot) -> bool,
{
    for tick in 0..max_ticks {
        if done(&agent.snapshot) {
            return Some(tick);
        }
        let controls = control(&agent.snapshot);
        agent.step(world, &controls);
    }
    done(&agent.snapshot).then_some(max_ticks)
}
