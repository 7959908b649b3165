//! Incremental A* pathfinding over a voxel world.
//!
//! The engine plans a feet-position path between block centers using
//! a budgeted, resumable search: callers hand [`PathSearch::compute`]
//! a wall-clock budget per tick and loop while the result is
//! [`PathStatus::Partial`]. When the goal turns out to be
//! unreachable or time runs out, graceful degradation returns the
//! best progress-making prefix found so far instead of nothing.

#![warn(missing_docs)]

mod arena;
mod astar;
mod cost;
mod favoring;
mod goal;
mod heap;
mod moves;

pub use astar::{PathNode, PathResult, PathSearch, PathStatus, SearchConfig};
pub use cost::*;
pub use favoring::{Favoring, BACKTRACK_PENALTY};
pub use goal::{walk_estimate, Goal};
pub use moves::{Edge, MoveKind, TravelCaps};
