//! Budgeted, resumable A* over the voxel move graph.
//!
//! One [`PathSearch`] owns the node arena, open heap and closed set
//! for a single invocation. `compute` advances the search by a
//! bounded wall-clock slice and returns control to the caller's tick
//! loop; callers re-invoke it while the status is `Partial`.

use crate::arena::{NodeArena, NodeId};
use crate::favoring::Favoring;
use crate::goal::Goal;
use crate::heap::OpenHeap;
use crate::moves::{Edge, MoveGenerator, MoveKind, TravelCaps};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use voxelnav_core::{BlockPos, NavError};
use voxelnav_world::WorldView;

/// Coefficients for graceful degradation, tightest first. Each
/// tracks the best node seen under `h + g/coef`; looser coefficients
/// tolerate more accumulated cost for the same remaining estimate.
const DEGRADATION_COEFFICIENTS: [f64; 7] = [1.5, 2.0, 2.5, 3.0, 4.0, 5.0, 10.0];

/// Tuning for one search invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Global wall-clock allowance across all `compute` calls.
    pub total_timeout: Duration,
    /// Tighter allowance that applies until the search has made real
    /// progress away from the start, so unreachable goals fail fast.
    pub failure_timeout: Duration,
    /// Expansions between wall-clock checks; rounded up to a power
    /// of two so the check is a mask test.
    pub check_interval: u32,
    /// Minimum cost improvement worth updating a node over, to avoid
    /// float-noise heap churn.
    pub min_improvement: f64,
    /// Minimum distance from the start for a degraded path to count
    /// as progress.
    pub min_path_dist: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            total_timeout: Duration::from_secs(2),
            failure_timeout: Duration::from_millis(500),
            check_interval: 64,
            min_improvement: 0.01,
            min_path_dist: 5.0,
        }
    }
}

/// Terminal or in-progress status of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStatus {
    /// The goal was reached; the path is complete.
    Success,
    /// The per-call budget ran out; call `compute` again.
    Partial,
    /// The global timeout elapsed; the path is the best found.
    Timeout,
    /// The reachable frontier was exhausted without reaching the
    /// goal. The attached path is empty unless a degradation tracker
    /// recorded real progress away from the start; the
    /// closest-to-goal fallback is reserved for timeouts, so a
    /// walled-in start reports an empty route instead of pointing at
    /// a neighboring block.
    NoPath,
}

/// One step of a computed path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    /// Feet position for this step.
    pub pos: BlockPos,
    /// How the agent enters this position from the previous step.
    /// The first node of a path carries a placeholder `Traverse`.
    pub kind: MoveKind,
    /// Blocks that must be broken to enter this position.
    pub to_break: Vec<BlockPos>,
    /// Block spaces that must be filled to enter this position.
    pub to_place: Vec<BlockPos>,
}

/// Outcome of a `compute` call, with telemetry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathResult {
    /// Terminal or in-progress status.
    pub status: PathStatus,
    /// Node sequence from start to end; empty on `Partial` and on a
    /// `NoPath` with no usable progress.
    pub path: Vec<PathNode>,
    /// Accumulated cost of the returned path in ticks.
    pub cost: f64,
    /// Wall-clock time spent across all `compute` calls so far.
    pub elapsed: Duration,
    /// Nodes dequeued and examined.
    pub visited: u64,
    /// Nodes newly inserted into the open set.
    pub generated: u64,
}

/// A resumable A* search instance. Owns its open/closed sets
/// exclusively; exactly one search is active per agent.
pub struct PathSearch {
    start: BlockPos,
    goal: Goal,
    caps: TravelCaps,
    favoring: Favoring,
    config: SearchConfig,
    interval_mask: u64,

    arena: NodeArena,
    open: OpenHeap,
    open_lookup: HashMap<BlockPos, NodeId>,
    closed: HashSet<BlockPos>,
    scratch: Vec<Edge>,

    // Degradation tracking: best score per coefficient, plus the
    // globally closest-to-goal node ever dequeued.
    best_by_coef: [(f64, Option<NodeId>); DEGRADATION_COEFFICIENTS.len()],
    best_h: f64,
    best_h_node: Option<NodeId>,

    steps: u64,
    visited: u64,
    generated: u64,
    elapsed: Duration,
    failing: bool,
    done: Option<PathStatus>,
}

impl PathSearch {
    /// Create a search from `start` toward `goal`.
    ///
    /// Fails fast when the goal is malformed (a NaN-capable
    /// heuristic would corrupt heap ordering).
    pub fn new(
        start: BlockPos,
        goal: Goal,
        caps: TravelCaps,
        favoring: Favoring,
        config: SearchConfig,
    ) -> Result<Self, NavError> {
        goal.validate()?;
        let mut arena = NodeArena::new();
        let mut open = OpenHeap::new();
        let mut open_lookup = HashMap::new();
        let h = goal.heuristic(start);
        let root = arena.alloc(start, 0.0, h, None, MoveKind::Traverse, vec![], vec![]);
        open.push(&mut arena, root);
        open_lookup.insert(start, root);
        let interval_mask = u64::from(config.check_interval.max(1).next_power_of_two()) - 1;
        Ok(Self {
            start,
            goal,
            caps,
            favoring,
            config,
            interval_mask,
            arena,
            open,
            open_lookup,
            closed: HashSet::new(),
            scratch: Vec::new(),
            best_by_coef: [(f64::INFINITY, None); DEGRADATION_COEFFICIENTS.len()],
            best_h: h,
            best_h_node: None,
            steps: 0,
            visited: 0,
            generated: 1,
            elapsed: Duration::ZERO,
            failing: true,
            done: None,
        })
    }

    /// The goal this search drives toward.
    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Advance the search by at most `budget` of wall-clock time.
    ///
    /// Returns `Partial` when the budget runs out with work left;
    /// callers loop until a terminal status comes back. Calling
    /// again after a terminal status returns that status with an
    /// empty path.
    pub fn compute<W: WorldView>(&mut self, world: &W, budget: Duration) -> PathResult {
        if let Some(status) = self.done {
            return self.result(status, Vec::new(), 0.0);
        }
        let call_start = Instant::now();
        loop {
            self.steps += 1;
            if self.steps & self.interval_mask == 0 {
                let call_elapsed = call_start.elapsed();
                let timeout = if self.failing {
                    self.config.failure_timeout
                } else {
                    self.config.total_timeout
                };
                if self.elapsed + call_elapsed >= timeout {
                    self.elapsed += call_elapsed;
                    return self.finish(PathStatus::Timeout, true);
                }
                if call_elapsed >= budget {
                    self.elapsed += call_elapsed;
                    return self.result(PathStatus::Partial, Vec::new(), 0.0);
                }
            }

            let Some(id) = self.open.pop(&mut self.arena) else {
                self.elapsed += call_start.elapsed();
                return self.finish(PathStatus::NoPath, false);
            };
            self.visited += 1;

            let (pos, g, h) = {
                let node = self.arena.get(id);
                (node.pos, node.g, node.h)
            };
            self.track_best(id, g, h, pos);

            if self.goal.is_end(pos) {
                self.elapsed += call_start.elapsed();
                let (path, cost) = self.reconstruct(id);
                tracing::debug!(
                    visited = self.visited,
                    generated = self.generated,
                    cost,
                    "search reached goal"
                );
                self.done = Some(PathStatus::Success);
                return self.result(PathStatus::Success, path, cost);
            }

            self.open_lookup.remove(&pos);
            self.closed.insert(pos);
            self.expand(world, id, pos, g);
        }
    }

    fn track_best(&mut self, id: NodeId, g: f64, h: f64, pos: BlockPos) {
        if self.failing {
            let dist = self.config.min_path_dist;
            if pos.distance_sq(self.start) > dist * dist {
                self.failing = false;
            }
        }
        for (slot, coef) in self
            .best_by_coef
            .iter_mut()
            .zip(DEGRADATION_COEFFICIENTS)
        {
            let score = h + g / coef;
            if score + self.config.min_improvement < slot.0 {
                *slot = (score, Some(id));
            }
        }
        if h + self.config.min_improvement < self.best_h {
            self.best_h = h;
            self.best_h_node = Some(id);
        }
    }

    fn expand<W: WorldView>(&mut self, world: &W, id: NodeId, pos: BlockPos, g: f64) {
        let mut edges = std::mem::take(&mut self.scratch);
        edges.clear();
        {
            let generator = MoveGenerator::new(world, &self.caps, &self.favoring);
            generator.neighbors(pos, &mut edges);
        }
        for edge in edges.drain(..) {
            if self.closed.contains(&edge.dest) {
                continue;
            }
            let tentative = g + edge.cost;
            if let Some(&existing) = self.open_lookup.get(&edge.dest) {
                // Improve in place; the node keeps its identity so
                // the heap back-reference stays valid.
                if tentative + self.config.min_improvement < self.arena.get(existing).g {
                    let node = self.arena.get_mut(existing);
                    node.g = tentative;
                    node.f = tentative + node.h;
                    node.parent = Some(id);
                    node.kind = edge.kind;
                    node.to_break = edge.to_break;
                    node.to_place = edge.to_place;
                    self.open.decrease_key(&mut self.arena, existing);
                }
            } else {
                let h = self.goal.heuristic(edge.dest);
                let new_id = self.arena.alloc(
                    edge.dest,
                    tentative,
                    h,
                    Some(id),
                    edge.kind,
                    edge.to_break,
                    edge.to_place,
                );
                self.open.push(&mut self.arena, new_id);
                self.open_lookup.insert(edge.dest, new_id);
                self.generated += 1;
            }
        }
        self.scratch = edges;
    }

    /// Resolve a terminal status, attaching the best degraded path
    /// available. `allow_fallback` additionally permits the
    /// closest-to-goal node when no coefficient tracker qualifies;
    /// it is granted on timeouts but not on a plain `NoPath`, whose
    /// contract is an empty path when no real progress was made.
    fn finish(&mut self, status: PathStatus, allow_fallback: bool) -> PathResult {
        self.done = Some(status);
        let best = self.find_best_partial(allow_fallback);
        let (path, cost) = match best {
            Some(id) => self.reconstruct(id),
            None => (Vec::new(), 0.0),
        };
        tracing::debug!(
            ?status,
            visited = self.visited,
            generated = self.generated,
            path_len = path.len(),
            "search finished without reaching goal"
        );
        self.result(status, path, cost)
    }

    /// Scan the degradation trackers from tightest to loosest and
    /// return the first best-node that made real progress from the
    /// start; optionally fall back to the node that got closest to
    /// the goal.
    fn find_best_partial(&self, allow_fallback: bool) -> Option<NodeId> {
        let min_sq = self.config.min_path_dist * self.config.min_path_dist;
        for (_, id) in &self.best_by_coef {
            if let Some(id) = *id {
                if self.arena.get(id).pos.distance_sq(self.start) > min_sq {
                    return Some(id);
                }
            }
        }
        if allow_fallback {
            self.best_h_node
        } else {
            None
        }
    }

    fn reconstruct(&self, id: NodeId) -> (Vec<PathNode>, f64) {
        let chain = self.arena.chain(id);
        let cost = self.arena.get(id).g;
        let path = chain
            .into_iter()
            .map(|node_id| {
                let node = self.arena.get(node_id);
                PathNode {
                    pos: node.pos,
                    kind: node.kind,
                    to_break: node.to_break.clone(),
                    to_place: node.to_place.clone(),
                }
            })
            .collect();
        (path, cost)
    }

    fn result(&self, status: PathStatus, path: Vec<PathNode>, cost: f64) -> PathResult {
        PathResult {
            status,
            path,
            cost,
            elapsed: self.elapsed,
            visited: self.visited,
            generated: self.generated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelnav_testkit::{flat_plane, sealed_box};

    fn flat_world() -> voxelnav_world::VoxelWorld {
        flat_plane(63, 31)
    }

    fn search(start: BlockPos, goal: Goal, config: SearchConfig) -> PathSearch {
        PathSearch::new(start, goal, TravelCaps::default(), Favoring::new(), config)
            .expect("valid goal")
    }

    #[test]
    fn finds_exact_path_on_open_plane() {
        let world = flat_world();
        let start = BlockPos::new(0, 64, 0);
        let goal_pos = BlockPos::new(5, 64, 5);
        let mut search = search(start, Goal::Block(goal_pos), SearchConfig::default());
        let result = search.compute(&world, Duration::from_secs(1));
        assert_eq!(result.status, PathStatus::Success);
        assert_eq!(result.path.first().map(|n| n.pos), Some(start));
        assert_eq!(result.path.last().map(|n| n.pos), Some(goal_pos));
        assert!(result.visited > 0);
        assert!(result.generated >= result.path.len() as u64);
        assert!(result.cost > 0.0);
    }

    #[test]
    fn path_steps_are_adjacent_and_acyclic() {
        let world = flat_world();
        let start = BlockPos::new(0, 64, 0);
        let goal_pos = BlockPos::new(5, 64, 5);
        let mut search = search(start, Goal::Block(goal_pos), SearchConfig::default());
        let result = search.compute(&world, Duration::from_secs(1));
        assert_eq!(result.status, PathStatus::Success);
        for pair in result.path.windows(2) {
            assert!(
                pair[0].pos.distance(pair[1].pos) <= 2.0_f64.sqrt() + 1e-9,
                "consecutive steps must be adjacent"
            );
        }
        let mut seen = std::collections::HashSet::new();
        for node in &result.path {
            assert!(seen.insert(node.pos), "path revisits {:?}", node.pos);
        }
    }

    #[test]
    fn cost_grows_monotonically_along_the_parent_chain() {
        let world = flat_world();
        let start = BlockPos::new(0, 64, 0);
        let goal_pos = BlockPos::new(5, 64, 5);
        let mut search = search(start, Goal::Block(goal_pos), SearchConfig::default());
        let result = search.compute(&world, Duration::from_secs(1));
        assert_eq!(result.status, PathStatus::Success);
        // Every edge has positive cost, so accumulated cost can only
        // grow from the root outward.
        let goal_id = (0..search.arena.len() as u32)
            .map(NodeId)
            .find(|id| search.arena.get(*id).pos == goal_pos)
            .expect("goal node is in the arena");
        let mut last_g = -1.0;
        for id in search.arena.chain(goal_id) {
            let g = search.arena.get(id).g;
            assert!(g >= last_g, "cost decreased along the parent chain");
            last_g = g;
        }
        assert!((last_g - result.cost).abs() < 1e-9);
    }

    #[test]
    fn sealed_box_returns_no_path_with_empty_route() {
        let start = BlockPos::new(0, 64, 0);
        let world = sealed_box(63, start);
        let caps = TravelCaps {
            can_dig: false,
            can_place: false,
            allow_parkour: false,
            ..TravelCaps::default()
        };
        let mut search = PathSearch::new(
            start,
            Goal::Block(BlockPos::new(10, 64, 10)),
            caps,
            Favoring::new(),
            SearchConfig::default(),
        )
        .expect("valid goal");
        let result = search.compute(&world, Duration::from_secs(1));
        assert_eq!(result.status, PathStatus::NoPath);
        assert!(result.path.is_empty());
    }

    #[test]
    fn degraded_timeout_path_moves_toward_goal() {
        let world = flat_world();
        let start = BlockPos::new(0, 64, 0);
        let goal = Goal::Block(BlockPos::new(300, 64, 300));
        let config = SearchConfig {
            total_timeout: Duration::ZERO,
            failure_timeout: Duration::ZERO,
            ..SearchConfig::default()
        };
        let mut search = search_with(start, goal.clone(), config);
        let result = search.compute(&world, Duration::from_secs(1));
        assert_eq!(result.status, PathStatus::Timeout);
        assert!(!result.path.is_empty());
        let last = result.path.last().expect("non-empty").pos;
        assert!(goal.heuristic(last) < goal.heuristic(start));
    }

    fn search_with(start: BlockPos, goal: Goal, config: SearchConfig) -> PathSearch {
        PathSearch::new(start, goal, TravelCaps::default(), Favoring::new(), config)
            .expect("valid goal")
    }

    #[test]
    fn partial_result_resumes_to_success() {
        let world = flat_world();
        let start = BlockPos::new(0, 64, 0);
        let goal_pos = BlockPos::new(5, 64, 5);
        let config = SearchConfig {
            check_interval: 1,
            total_timeout: Duration::from_secs(60),
            failure_timeout: Duration::from_secs(60),
            ..SearchConfig::default()
        };
        let mut search = search_with(start, Goal::Block(goal_pos), config);
        let first = search.compute(&world, Duration::ZERO);
        assert_eq!(first.status, PathStatus::Partial);
        assert!(first.path.is_empty());
        let second = search.compute(&world, Duration::from_secs(10));
        assert_eq!(second.status, PathStatus::Success);
        assert_eq!(second.path.last().map(|n| n.pos), Some(goal_pos));
    }

    #[test]
    fn backtrack_favoring_steers_away_from_previous_path() {
        let world = flat_world();
        let start = BlockPos::new(0, 64, 0);
        let goal_pos = BlockPos::new(6, 64, 0);
        // Heavily penalize the straight line; the search should still
        // succeed but pay more or go around.
        let mut favoring = Favoring::new();
        for x in 1..6 {
            favoring.apply(BlockPos::new(x, 64, 0), 10.0);
        }
        let mut plain = search_with(start, Goal::Block(goal_pos), SearchConfig::default());
        let plain_cost = plain.compute(&world, Duration::from_secs(1)).cost;
        let mut biased = PathSearch::new(
            start,
            Goal::Block(goal_pos),
            TravelCaps::default(),
            favoring,
            SearchConfig::default(),
        )
        .expect("valid goal");
        let biased_result = biased.compute(&world, Duration::from_secs(1));
        assert_eq!(biased_result.status, PathStatus::Success);
        assert!(biased_result.cost > plain_cost);
    }

    #[test]
    fn terminal_search_repeats_status_with_empty_path() {
        let world = flat_world();
        let start = BlockPos::new(0, 64, 0);
        let mut search = search(start, Goal::Block(start), SearchConfig::default());
        let first = search.compute(&world, Duration::from_secs(1));
        assert_eq!(first.status, PathStatus::Success);
        let again = search.compute(&world, Duration::from_secs(1));
        assert_eq!(again.status, PathStatus::Success);
        assert!(again.path.is_empty());
    }
}
