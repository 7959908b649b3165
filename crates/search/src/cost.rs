//! Tick-cost constants for the movement cost model.
//!
//! All costs are measured in simulation ticks (20 per second). The
//! base figures derive from vanilla travel speeds: walking covers
//! 4.317 blocks/s, sprinting 5.612, swimming 2.2.

/// Ticks to walk one block on flat ground.
pub const WALK_ONE_BLOCK_COST: f64 = 20.0 / 4.317;

/// Ticks to sprint one block on flat ground.
pub const SPRINT_ONE_BLOCK_COST: f64 = 20.0 / 5.612;

/// Ticks to swim one block horizontally.
pub const SWIM_ONE_BLOCK_COST: f64 = 20.0 / 2.2;

/// Extra ticks to swim one block straight up.
pub const SWIM_UP_ONE_COST: f64 = 10.0;

/// Ticks to sink/swim one block straight down.
pub const SWIM_DOWN_ONE_COST: f64 = 7.0;

/// Extra ticks to step from land into water.
pub const ENTER_WATER_COST: f64 = 2.0;

/// Extra ticks to haul out of water onto land.
pub const EXIT_WATER_COST: f64 = 4.0;

/// Ticks to climb one block up a ladder or vine.
pub const CLIMB_UP_ONE_COST: f64 = 20.0 / 2.35;

/// Ticks to climb one block down a ladder or vine.
pub const CLIMB_DOWN_ONE_COST: f64 = 20.0 / 3.0;

/// Extra ticks a jump adds over plain walking.
pub const JUMP_ONE_BLOCK_COST: f64 = 4.0;

/// Ticks to place one support block.
pub const PLACE_ONE_BLOCK_COST: f64 = 20.0;

/// Ticks to open and pass a door, gate or trapdoor.
pub const DOOR_INTERACT_COST: f64 = 5.0;

/// Ticks to deploy a water bucket below a long fall.
pub const WATER_BUCKET_COST: f64 = 10.0;

/// Ticks to re-center after landing a fall.
pub const CENTER_AFTER_FALL_COST: f64 = 1.0;

/// Diagonal step multiplier.
pub const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Vertical gravity acceleration in blocks per tick squared, used to
/// estimate fall durations.
const GRAVITY: f64 = 0.0784;

/// Ticks spent free-falling `blocks` levels.
pub fn fall_cost(blocks: i32) -> f64 {
    if blocks <= 0 {
        return 0.0;
    }
    (2.0 * blocks as f64 / GRAVITY).sqrt() + CENTER_AFTER_FALL_COST
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprinting_beats_walking_beats_swimming() {
        assert!(SPRINT_ONE_BLOCK_COST < WALK_ONE_BLOCK_COST);
        assert!(WALK_ONE_BLOCK_COST < SWIM_ONE_BLOCK_COST);
    }

    #[test]
    fn fall_cost_grows_with_height() {
        assert_eq!(fall_cost(0), 0.0);
        assert!(fall_cost(1) < fall_cost(3));
        assert!(fall_cost(3) < fall_cost(10));
    }
}
