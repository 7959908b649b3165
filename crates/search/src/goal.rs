//! Goal predicates over block positions.
//!
//! Goals are a closed enum dispatched by match; each variant answers
//! `is_end` and supplies a heuristic estimate in ticks. Heuristics
//! are not required to be admissible (degradation tolerates that),
//! but they must never be NaN, which is enforced at construction.

use crate::cost::{CLIMB_UP_ONE_COST, SPRINT_ONE_BLOCK_COST, WALK_ONE_BLOCK_COST};
use voxelnav_core::{BlockPos, NavError};

/// Estimated ticks to cover a straight-line block distance.
fn travel_ticks(distance: f64) -> f64 {
    distance * SPRINT_ONE_BLOCK_COST
}

/// Estimated ticks to cover a vertical block distance.
fn vertical_ticks(dy: f64) -> f64 {
    dy.abs() * CLIMB_UP_ONE_COST
}

/// A goal predicate the search drives toward.
#[derive(Debug, Clone)]
pub enum Goal {
    /// Reach an exact block.
    Block(BlockPos),
    /// Get within `radius` blocks of a center.
    Near {
        /// Center of the acceptance sphere.
        center: BlockPos,
        /// Acceptance radius in blocks.
        radius: f64,
    },
    /// Reach a vertical column, any Y.
    Xz {
        /// Target column X.
        x: i32,
        /// Target column Z.
        z: i32,
    },
    /// Reach a Y level, anywhere horizontally.
    YLevel(i32),
    /// Satisfy every sub-goal at once.
    And(Vec<Goal>),
    /// Get within `radius` of a moving target's last known position.
    ///
    /// The caller re-plans when the target strays; the engine only
    /// ever sees a snapshot.
    Follow {
        /// Last known target position.
        target: BlockPos,
        /// Acceptance radius in blocks.
        radius: f64,
    },
    /// Get at least `distance` blocks away from every threat.
    Avoid {
        /// Positions to flee from.
        threats: Vec<BlockPos>,
        /// Required clearance in blocks.
        distance: f64,
    },
}

impl Goal {
    /// A goal accepted within `radius` of `center`.
    pub fn near(center: BlockPos, radius: f64) -> Result<Self, NavError> {
        let goal = Goal::Near { center, radius };
        goal.validate()?;
        Ok(goal)
    }

    /// A goal following a moving target at `radius`.
    pub fn follow(target: BlockPos, radius: f64) -> Result<Self, NavError> {
        let goal = Goal::Follow { target, radius };
        goal.validate()?;
        Ok(goal)
    }

    /// A goal fleeing all `threats` to at least `distance`.
    pub fn avoid(threats: Vec<BlockPos>, distance: f64) -> Result<Self, NavError> {
        let goal = Goal::Avoid { threats, distance };
        goal.validate()?;
        Ok(goal)
    }

    /// Check the goal's parameters; a goal that could produce a NaN
    /// heuristic is a programmer error and is rejected here rather
    /// than being allowed to corrupt heap ordering later.
    pub fn validate(&self) -> Result<(), NavError> {
        match self {
            Goal::Block(_) | Goal::Xz { .. } | Goal::YLevel(_) => Ok(()),
            Goal::Near { radius, .. } | Goal::Follow { radius, .. } => {
                if radius.is_finite() && *radius >= 0.0 {
                    Ok(())
                } else {
                    Err(NavError::InvalidGoal(format!(
                        "radius must be finite and non-negative, got {radius}"
                    )))
                }
            }
            Goal::And(goals) => {
                if goals.is_empty() {
                    return Err(NavError::InvalidGoal(
                        "composite goal needs at least one sub-goal".into(),
                    ));
                }
                for goal in goals {
                    goal.validate()?;
                }
                Ok(())
            }
            Goal::Avoid { threats, distance } => {
                if threats.is_empty() {
                    return Err(NavError::InvalidGoal(
                        "avoid goal needs at least one threat".into(),
                    ));
                }
                if distance.is_finite() && *distance >= 0.0 {
                    Ok(())
                } else {
                    Err(NavError::InvalidGoal(format!(
                        "distance must be finite and non-negative, got {distance}"
                    )))
                }
            }
        }
    }

    /// Whether `pos` satisfies the goal.
    pub fn is_end(&self, pos: BlockPos) -> bool {
        match self {
            Goal::Block(target) => pos == *target,
            Goal::Near { center, radius } => pos.distance_sq(*center) <= radius * radius,
            Goal::Xz { x, z } => pos.x == *x && pos.z == *z,
            Goal::YLevel(y) => pos.y == *y,
            Goal::And(goals) => goals.iter().all(|goal| goal.is_end(pos)),
            Goal::Follow { target, radius } => pos.distance_sq(*target) <= radius * radius,
            Goal::Avoid { threats, distance } => threats
                .iter()
                .all(|threat| pos.distance_sq(*threat) >= distance * distance),
        }
    }

    /// Estimated ticks from `pos` to goal satisfaction. Never NaN.
    pub fn heuristic(&self, pos: BlockPos) -> f64 {
        match self {
            Goal::Block(target) => {
                let dy = (target.y - pos.y) as f64;
                travel_ticks(pos.distance_sq_xz(*target).sqrt()) + vertical_ticks(dy)
            }
            Goal::Near { center, radius } | Goal::Follow { target: center, radius } => {
                travel_ticks((pos.distance(*center) - radius).max(0.0))
            }
            Goal::Xz { x, z } => {
                let dx = (pos.x - x) as f64;
                let dz = (pos.z - z) as f64;
                travel_ticks((dx * dx + dz * dz).sqrt())
            }
            Goal::YLevel(y) => vertical_ticks((pos.y - y) as f64),
            Goal::And(goals) => goals
                .iter()
                .map(|goal| goal.heuristic(pos))
                .fold(0.0, f64::max),
            Goal::Avoid { threats, distance } => threats
                .iter()
                .map(|threat| travel_ticks((distance - pos.distance(*threat)).max(0.0)))
                .sum(),
        }
    }
}

/// Walking estimate used when callers need a distance in ticks
/// without a goal object.
pub fn walk_estimate(from: BlockPos, to: BlockPos) -> f64 {
    from.distance(to) * WALK_ONE_BLOCK_COST
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_goal_is_exact() {
        let goal = Goal::Block(BlockPos::new(5, 64, 5));
        assert!(goal.is_end(BlockPos::new(5, 64, 5)));
        assert!(!goal.is_end(BlockPos::new(5, 65, 5)));
        assert_eq!(goal.heuristic(BlockPos::new(5, 64, 5)), 0.0);
    }

    #[test]
    fn goal_checks_are_referentially_stable() {
        let goal = Goal::near(BlockPos::new(0, 64, 0), 2.0).expect("valid goal");
        let pos = BlockPos::new(1, 64, 1);
        assert_eq!(goal.is_end(pos), goal.is_end(pos));
    }

    #[test]
    fn invalid_radius_fails_at_construction() {
        assert!(Goal::near(BlockPos::new(0, 0, 0), f64::NAN).is_err());
        assert!(Goal::near(BlockPos::new(0, 0, 0), -1.0).is_err());
        assert!(Goal::near(BlockPos::new(0, 0, 0), f64::INFINITY).is_err());
    }

    #[test]
    fn composite_goal_requires_all_members() {
        let goal = Goal::And(vec![
            Goal::Xz { x: 3, z: 4 },
            Goal::YLevel(64),
        ]);
        assert!(goal.is_end(BlockPos::new(3, 64, 4)));
        assert!(!goal.is_end(BlockPos::new(3, 70, 4)));
        assert!(!goal.is_end(BlockPos::new(0, 64, 4)));
    }

    #[test]
    fn avoid_goal_flees_all_threats() {
        let goal = Goal::avoid(vec![BlockPos::new(0, 64, 0)], 4.0).expect("valid goal");
        assert!(!goal.is_end(BlockPos::new(1, 64, 0)));
        assert!(goal.is_end(BlockPos::new(8, 64, 0)));
        // Heuristic shrinks as the agent gets farther away.
        assert!(
            goal.heuristic(BlockPos::new(1, 64, 0)) > goal.heuristic(BlockPos::new(3, 64, 0))
        );
    }

    #[test]
    fn heuristics_are_finite_everywhere() {
        let goals = [
            Goal::Block(BlockPos::new(100, 64, -100)),
            Goal::near(BlockPos::new(0, 0, 0), 3.0).unwrap(),
            Goal::Xz { x: -7, z: 9 },
            Goal::YLevel(12),
            Goal::avoid(vec![BlockPos::new(1, 1, 1)], 16.0).unwrap(),
        ];
        for goal in &goals {
            for pos in [
                BlockPos::new(0, 0, 0),
                BlockPos::new(-1000, 255, 1000),
                BlockPos::new(3, 64, 3),
            ] {
                assert!(goal.heuristic(pos).is_finite());
            }
        }
    }
}
