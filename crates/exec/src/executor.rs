//! Path executor: drives one movement per tick along a computed
//! path, with recovery for lag teleports, world edits, falls and
//! unloaded terrain.

use crate::movement::{Movement, MovementStatus};
use serde::{Deserialize, Serialize};
use voxelnav_core::{AgentSnapshot, ControlInputs, NavError};
use voxelnav_search::{MoveKind, PathNode, PathResult, TravelCaps};
use voxelnav_world::{BlockUpdateTracker, WorldView};

/// Why a path stopped being executable. `None` means no failure has
/// been recorded; `LagTeleport` is recorded when a rewind recovery
/// fires but does not terminate execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureMode {
    /// No failure.
    None,
    /// The agent was snapped backward and the cursor rewound.
    LagTeleport,
    /// A world edit touched the remaining path.
    BlockUpdate,
    /// A movement ran past its cost estimate plus buffer.
    MovementTimeout,
    /// The agent drifted off the path for too long.
    OffPathDrift,
    /// The caller found the current path too expensive to keep.
    CostInflation,
    /// A movement endpoint stayed unloaded past the wait limit.
    UnloadedChunk,
    /// The caller computed a better path.
    BetterPlan,
}

/// Executor outcome for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecStatus {
    /// A movement is in progress.
    Running,
    /// Waiting on the world (chunk load, block break).
    Waiting,
    /// The whole path completed.
    Done,
    /// Execution stopped; the mode says why.
    Failed(FailureMode),
}

/// Tuning for executor recovery behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Horizontal distance from both movement endpoints past which a
    /// tick counts as drifting.
    pub drift_threshold: f64,
    /// Consecutive drifting ticks before the path is abandoned.
    pub drift_limit: u32,
    /// Ticks past a movement's cost estimate before it times out.
    pub movement_buffer: u32,
    /// Ticks to wait for a movement endpoint's chunk to load.
    pub chunk_wait_limit: u32,
    /// Movements scanned ahead when deciding whether to sprint.
    pub sprint_lookahead: usize,
    /// Movements scanned ahead for opportunistic breaking.
    pub break_ahead: usize,
    /// Reach for opportunistic breaking, in blocks.
    pub interaction_range: f64,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            drift_threshold: 2.0,
            drift_limit: 40,
            movement_buffer: 40,
            chunk_wait_limit: 100,
            sprint_lookahead: 3,
            break_ahead: 2,
            interaction_range: 4.5,
        }
    }
}

/// Stitch two overlapping paths at their first shared node: the
/// prefix of `a` before the shared node, then all of `b` from it.
/// Returns `b` unchanged when the paths do not overlap.
pub fn splice(a: &[PathNode], b: &[PathNode]) -> Vec<PathNode> {
    for (i, node) in a.iter().enumerate() {
        if let Some(j) = b.iter().position(|other| other.pos == node.pos) {
            let mut out = a[..i].to_vec();
            out.extend_from_slice(&b[j..]);
            return out;
        }
    }
    b.to_vec()
}

/// Drives an agent along one computed path, one movement per tick.
pub struct PathExecutor {
    path: Vec<PathNode>,
    movements: Vec<Movement>,
    cursor: usize,
    controls: ControlInputs,
    config: ExecConfig,
    allow_sprint: bool,
    failure: FailureMode,
    drift_ticks: u32,
    movement_ticks: u32,
    chunk_wait_ticks: u32,
    // End index (inclusive) of the active fall-override run.
    fall_run_end: Option<usize>,
    finished: bool,
    cancelled: bool,
}

impl PathExecutor {
    /// Build an executor over a search result's path.
    ///
    /// Fails on an empty path; a single-node path (already at the
    /// goal) completes on the first tick.
    pub fn new(result: &PathResult, caps: &TravelCaps) -> Result<Self, NavError> {
        Self::from_path(result.path.clone(), caps)
    }

    /// Build an executor over an explicit node sequence (used after
    /// splicing a replanned path onto the current one).
    pub fn from_path(path: Vec<PathNode>, caps: &TravelCaps) -> Result<Self, NavError> {
        if path.is_empty() {
            return Err(NavError::EmptyPath);
        }
        let movements = path
            .windows(2)
            .map(|pair| Movement::new(pair[0].pos, pair[1].clone()))
            .collect();
        Ok(Self {
            path,
            movements,
            cursor: 0,
            controls: ControlInputs::default(),
            config: ExecConfig::default(),
            allow_sprint: caps.allow_sprint,
            failure: FailureMode::None,
            drift_ticks: 0,
            movement_ticks: 0,
            chunk_wait_ticks: 0,
            fall_run_end: None,
            finished: false,
            cancelled: false,
        })
    }

    /// Replace the default recovery tuning.
    pub fn with_config(mut self, config: ExecConfig) -> Self {
        self.config = config;
        self
    }

    /// The node sequence being executed.
    pub fn path(&self) -> &[PathNode] {
        &self.path
    }

    /// Index of the movement currently being driven.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Controls computed by the most recent tick.
    pub fn controls(&self) -> &ControlInputs {
        &self.controls
    }

    /// The most recently recorded failure mode, including recoverable
    /// ones like [`FailureMode::LagTeleport`].
    pub fn failure(&self) -> FailureMode {
        self.failure
    }

    /// Abandon the path: clears movement state and control inputs
    /// immediately, recording the given mode.
    pub fn cancel(&mut self, mode: FailureMode) {
        self.controls.clear();
        self.fall_run_end = None;
        self.finished = true;
        self.cancelled = true;
        self.failure = mode;
        tracing::debug!(?mode, cursor = self.cursor, "path execution cancelled");
    }

    /// Advance execution by one tick.
    pub fn tick<W: WorldView>(
        &mut self,
        world: &W,
        updates: &mut BlockUpdateTracker,
        agent: &AgentSnapshot,
    ) -> ExecStatus {
        if self.finished {
            return self.final_status();
        }
        self.controls.clear();

        if self.path_invalidated(world, updates) {
            self.cancel(FailureMode::BlockUpdate);
            return self.final_status();
        }

        self.recover_from_teleport(agent);
        self.skip_completed_movements(agent);

        if self.cursor >= self.movements.len() {
            self.finished = true;
            return ExecStatus::Done;
        }

        if let Some(status) = self.fall_override(agent) {
            return status;
        }

        if let Some(status) = self.gate_on_chunks(world) {
            return status;
        }
        self.chunk_wait_ticks = 0;

        let movement = &mut self.movements[self.cursor];
        let status = movement.tick(world, agent, &mut self.controls);
        self.movement_ticks += 1;

        match status {
            MovementStatus::Success => {
                self.cursor += 1;
                self.movement_ticks = 0;
                self.drift_ticks = 0;
                if self.cursor >= self.movements.len() {
                    self.finished = true;
                    return ExecStatus::Done;
                }
                ExecStatus::Running
            }
            MovementStatus::Running | MovementStatus::Waiting => {
                if self.movement_timed_out(world) {
                    self.cancel(FailureMode::MovementTimeout);
                    return self.final_status();
                }
                if self.drifted(agent) {
                    self.cancel(FailureMode::OffPathDrift);
                    return self.final_status();
                }
                // A movement may have demanded sprint itself (parkour
                // takeoff); the lookahead only ever adds it.
                self.controls.sprint = self.controls.sprint || self.should_sprint(agent);
                self.break_ahead(world, agent);
                if status == MovementStatus::Waiting {
                    ExecStatus::Waiting
                } else {
                    ExecStatus::Running
                }
            }
            MovementStatus::Failed | MovementStatus::Unreachable => {
                tracing::warn!(
                    cursor = self.cursor,
                    kind = ?self.movements[self.cursor].kind(),
                    ?status,
                    "movement cannot continue"
                );
                self.cancel(FailureMode::MovementTimeout);
                self.final_status()
            }
        }
    }

    fn final_status(&self) -> ExecStatus {
        if self.cancelled {
            ExecStatus::Failed(self.failure)
        } else {
            ExecStatus::Done
        }
    }

    /// Drain pending world edits and fail the path when one
    /// contradicts it. Edits the path itself scheduled are fine: a
    /// `to_break` entry that is now clear, or a `to_place` entry that
    /// is now solid, is the plan happening, not the plan breaking.
    fn path_invalidated<W: WorldView>(
        &mut self,
        world: &W,
        updates: &mut BlockUpdateTracker,
    ) -> bool {
        let edits = updates.drain();
        if edits.is_empty() {
            return false;
        }
        let remaining = &self.path[self.cursor.min(self.path.len() - 1)..];
        'edits: for edit in edits {
            for node in remaining {
                if node.to_break.contains(&edit) && world.can_walk_through(edit) {
                    continue 'edits;
                }
                if node.to_place.contains(&edit) && !world.can_walk_through(edit) {
                    continue 'edits;
                }
            }
            for node in remaining {
                if (edit == node.pos || edit == node.pos.up()) && !world.can_walk_through(edit) {
                    tracing::debug!(?edit, "edit blocks a remaining path position");
                    return true;
                }
                if node.to_break.contains(&edit) || node.to_place.contains(&edit) {
                    tracing::debug!(?edit, "edit contradicts scheduled break/place work");
                    return true;
                }
            }
        }
        false
    }

    /// If the agent matches an earlier path node than the cursor, a
    /// server snapped it backward: rewind and restart that movement.
    fn recover_from_teleport(&mut self, agent: &AgentSnapshot) {
        let feet = agent.feet();
        for index in 0..self.cursor {
            if self.path[index].pos == feet && agent.distance_sq_xz_to(feet) < 0.25 {
                tracing::debug!(from = self.cursor, to = index, "lag teleport rewind");
                self.cursor = index;
                self.movements[index].reset();
                self.movement_ticks = 0;
                self.drift_ticks = 0;
                self.fall_run_end = None;
                self.failure = FailureMode::LagTeleport;
                return;
            }
        }
    }

    /// If the agent already stands at the destination of a movement
    /// at or ahead of the cursor, jump the cursor past it.
    fn skip_completed_movements(&mut self, agent: &AgentSnapshot) {
        if !agent.on_ground {
            return;
        }
        let feet = agent.feet();
        for index in self.cursor..self.movements.len() {
            if self.movements[index].dest() == feet {
                if index + 1 > self.cursor {
                    self.cursor = index + 1;
                    self.movement_ticks = 0;
                    self.drift_ticks = 0;
                    if self.cursor < self.movements.len() {
                        self.movements[self.cursor].reset();
                    }
                }
                return;
            }
        }
    }

    /// While airborne over a run of fall-compatible movements, steer
    /// straight for the run's final destination instead of ticking
    /// each movement discretely.
    fn fall_override(&mut self, agent: &AgentSnapshot) -> Option<ExecStatus> {
        if self.fall_run_end.is_none() {
            let arming = self.movements[self.cursor].is_falling_phase()
                && self.movements[self.cursor].can_accept_fall();
            if !arming {
                return None;
            }
            let mut end = self.cursor;
            while end + 1 < self.movements.len() && self.movements[end + 1].can_accept_fall() {
                end += 1;
            }
            self.fall_run_end = Some(end);
            tracing::debug!(start = self.cursor, end, "fall override armed");
        }
        let end = self.fall_run_end?;

        if agent.on_ground || agent.in_water {
            self.fall_run_end = None;
            let feet = agent.feet();
            for index in self.cursor..=end {
                if self.movements[index].dest() == feet {
                    self.cursor = index + 1;
                    self.movement_ticks = 0;
                    if self.cursor >= self.movements.len() {
                        self.finished = true;
                        return Some(ExecStatus::Done);
                    }
                    return Some(ExecStatus::Running);
                }
            }
            self.cancel(FailureMode::OffPathDrift);
            return Some(self.final_status());
        }

        self.controls.walk_toward(self.movements[end].dest().center());
        Some(ExecStatus::Running)
    }

    /// Hold a movement until both of its endpoints are in loaded
    /// terrain; waiting is tick-counted and bounded.
    fn gate_on_chunks<W: WorldView>(&mut self, world: &W) -> Option<ExecStatus> {
        let movement = &self.movements[self.cursor];
        if world.is_loaded(movement.from()) && world.is_loaded(movement.dest()) {
            return None;
        }
        self.chunk_wait_ticks += 1;
        if self.chunk_wait_ticks > self.config.chunk_wait_limit {
            self.cancel(FailureMode::UnloadedChunk);
            return Some(self.final_status());
        }
        self.controls.clear();
        Some(ExecStatus::Waiting)
    }

    fn movement_timed_out<W: WorldView>(&self, world: &W) -> bool {
        let estimate = self.movements[self.cursor].cost_estimate(world);
        self.movement_ticks as f64 > estimate + self.config.movement_buffer as f64
    }

    fn drifted(&mut self, agent: &AgentSnapshot) -> bool {
        let movement = &self.movements[self.cursor];
        let limit_sq = self.config.drift_threshold * self.config.drift_threshold;
        let off = agent.distance_sq_xz_to(movement.from()) > limit_sq
            && agent.distance_sq_xz_to(movement.dest()) > limit_sq;
        if off {
            self.drift_ticks += 1;
        } else {
            self.drift_ticks = 0;
        }
        self.drift_ticks > self.config.drift_limit
    }

    /// Sprint only when the next few movements run straight and
    /// level: never into a descent, never through a sharp turn.
    fn should_sprint(&self, agent: &AgentSnapshot) -> bool {
        if !self.allow_sprint || agent.in_water {
            return false;
        }
        let window = &self.movements
            [self.cursor..(self.cursor + self.config.sprint_lookahead).min(self.movements.len())];
        let mut prev_dir: Option<(i32, i32)> = None;
        for movement in window {
            match movement.kind() {
                MoveKind::Traverse | MoveKind::Diagonal | MoveKind::Ascend => {}
                _ => return false,
            }
            let from = movement.from();
            let dest = movement.dest();
            let dir = ((dest.x - from.x).signum(), (dest.z - from.z).signum());
            if let Some(prev) = prev_dir {
                // Reject turns sharper than 45 degrees: the dot
                // product of unit-ish grid directions must stay
                // positive.
                if prev.0 * dir.0 + prev.1 * dir.1 <= 0 {
                    return false;
                }
            }
            prev_dir = Some(dir);
        }
        true
    }

    /// Start breaking upcoming obstructions that are already within
    /// reach, so approach and digging overlap.
    fn break_ahead<W: WorldView>(&mut self, world: &W, agent: &AgentSnapshot) {
        if self.controls.dig_target.is_some() {
            return;
        }
        let range_sq = self.config.interaction_range * self.config.interaction_range;
        let window = (self.cursor + 1)
            ..(self.cursor + 1 + self.config.break_ahead).min(self.movements.len());
        for index in window {
            for block in self.movements[index].to_break() {
                if world.can_walk_through(*block) {
                    continue;
                }
                if agent.distance_sq_to(*block) <= range_sq {
                    self.controls.dig_target = Some(*block);
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelnav_core::BlockPos;
    use voxelnav_testkit::{flat_plane, SimAgent};
    use voxelnav_world::BLOCK_STONE;

    fn node_at(x: i32, y: i32, z: i32) -> PathNode {
        PathNode {
            pos: BlockPos::new(x, y, z),
            kind: MoveKind::Traverse,
            to_break: vec![],
            to_place: vec![],
        }
    }

    fn executor_over(path: Vec<PathNode>) -> PathExecutor {
        PathExecutor::from_path(path, &TravelCaps::default()).expect("non-empty path")
    }

    #[test]
    fn own_scheduled_dig_does_not_cancel_execution() {
        // The dug block is already clear in the world, exactly as it
        // looks right after the agent's planned dig resolves.
        let world = flat_plane(63, 8);
        let dug = BlockPos::new(2, 64, 0);
        let path = vec![
            node_at(0, 64, 0),
            node_at(1, 64, 0),
            PathNode {
                pos: dug,
                kind: MoveKind::Traverse,
                to_break: vec![dug],
                to_place: vec![],
            },
        ];
        let mut executor = executor_over(path);
        let mut updates = BlockUpdateTracker::new();
        updates.record(dug);
        let agent = SimAgent::standing_at(BlockPos::new(0, 64, 0));
        let status = executor.tick(&world, &mut updates, &agent.snapshot);
        assert_ne!(
            status,
            ExecStatus::Failed(FailureMode::BlockUpdate),
            "a dig the path scheduled is not a contradiction"
        );
    }

    #[test]
    fn resolidified_break_target_cancels_execution() {
        let mut world = flat_plane(63, 8);
        let blocked = BlockPos::new(2, 64, 0);
        world.set_block(blocked, BLOCK_STONE);
        let path = vec![
            node_at(0, 64, 0),
            node_at(1, 64, 0),
            PathNode {
                pos: blocked,
                kind: MoveKind::Traverse,
                to_break: vec![blocked],
                to_place: vec![],
            },
        ];
        let mut executor = executor_over(path);
        let mut updates = BlockUpdateTracker::new();
        // An edit at a break target that is still solid means someone
        // rebuilt it; the break estimate no longer holds.
        updates.record(blocked);
        let agent = SimAgent::standing_at(BlockPos::new(0, 64, 0));
        let status = executor.tick(&world, &mut updates, &agent.snapshot);
        assert_eq!(status, ExecStatus::Failed(FailureMode::BlockUpdate));
    }

    #[test]
    fn parkour_keeps_sprint_through_the_lookahead() {
        let world = flat_plane(63, 8);
        let path = vec![
            node_at(0, 64, 0),
            PathNode {
                pos: BlockPos::new(3, 64, 0),
                kind: MoveKind::Parkour,
                to_break: vec![],
                to_place: vec![],
            },
        ];
        let mut executor = executor_over(path);
        let mut updates = BlockUpdateTracker::new();
        let agent = SimAgent::standing_at(BlockPos::new(0, 64, 0));
        // Orientation tick first; the next tick has the movement
        // demanding sprint for takeoff speed.
        executor.tick(&world, &mut updates, &agent.snapshot);
        executor.tick(&world, &mut updates, &agent.snapshot);
        assert!(
            executor.controls().sprint,
            "parkour takeoff runs at sprint speed"
        );
    }

    #[test]
    fn sprint_lookahead_rejects_sharp_turns() {
        let world = flat_plane(63, 8);
        let mut updates = BlockUpdateTracker::new();
        let agent = SimAgent::standing_at(BlockPos::new(0, 64, 0));

        let straight = vec![
            node_at(0, 64, 0),
            node_at(1, 64, 0),
            node_at(2, 64, 0),
            node_at(3, 64, 0),
        ];
        let mut executor = executor_over(straight);
        executor.tick(&world, &mut updates, &agent.snapshot);
        assert!(executor.controls().sprint, "straight runs sprint");

        let turning = vec![node_at(0, 64, 0), node_at(1, 64, 0), node_at(1, 64, 1)];
        let mut executor = executor_over(turning);
        executor.tick(&world, &mut updates, &agent.snapshot);
        assert!(
            !executor.controls().sprint,
            "a 90 degree turn inside the window blocks sprint"
        );
    }

    #[test]
    fn unloaded_endpoint_fails_after_bounded_wait() {
        // Loaded chunks cover x up to 15; the destination at x = 16
        // sits in terrain that never loads.
        let world = flat_plane(63, 4);
        let path = vec![node_at(15, 64, 0), node_at(16, 64, 0)];
        let mut executor = executor_over(path).with_config(ExecConfig {
            chunk_wait_limit: 3,
            ..ExecConfig::default()
        });
        let mut updates = BlockUpdateTracker::new();
        let agent = SimAgent::standing_at(BlockPos::new(15, 64, 0));
        let mut status = ExecStatus::Running;
        for _ in 0..10 {
            status = executor.tick(&world, &mut updates, &agent.snapshot);
            if matches!(status, ExecStatus::Failed(_)) {
                break;
            }
            assert_eq!(status, ExecStatus::Waiting, "gating holds the movement");
        }
        assert_eq!(status, ExecStatus::Failed(FailureMode::UnloadedChunk));
    }

    #[test]
    fn stalled_movement_times_out() {
        let world = flat_plane(63, 8);
        let path = vec![node_at(0, 64, 0), node_at(1, 64, 0)];
        let mut executor = executor_over(path).with_config(ExecConfig {
            movement_buffer: 5,
            ..ExecConfig::default()
        });
        let mut updates = BlockUpdateTracker::new();
        // The agent never applies the controls, so the movement can
        // only age past its estimate.
        let agent = SimAgent::standing_at(BlockPos::new(0, 64, 0));
        let mut status = ExecStatus::Running;
        for _ in 0..60 {
            status = executor.tick(&world, &mut updates, &agent.snapshot);
            if matches!(status, ExecStatus::Failed(_)) {
                break;
            }
        }
        assert_eq!(status, ExecStatus::Failed(FailureMode::MovementTimeout));
    }

    #[test]
    fn sustained_drift_abandons_the_path() {
        let world = flat_plane(63, 16);
        let path = vec![node_at(0, 64, 0), node_at(1, 64, 0)];
        let mut executor = executor_over(path).with_config(ExecConfig {
            drift_limit: 4,
            movement_buffer: 200,
            ..ExecConfig::default()
        });
        let mut updates = BlockUpdateTracker::new();
        // Far from both endpoints of the current movement.
        let agent = SimAgent::standing_at(BlockPos::new(8, 64, 8));
        let mut status = ExecStatus::Running;
        for _ in 0..30 {
            status = executor.tick(&world, &mut updates, &agent.snapshot);
            if matches!(status, ExecStatus::Failed(_)) {
                break;
            }
        }
        assert_eq!(status, ExecStatus::Failed(FailureMode::OffPathDrift));
    }

    #[test]
    fn break_ahead_targets_upcoming_obstruction_within_reach() {
        let mut world = flat_plane(63, 8);
        let block = BlockPos::new(2, 64, 0);
        world.set_block(block, BLOCK_STONE);
        let path = vec![
            node_at(0, 64, 0),
            node_at(1, 64, 0),
            PathNode {
                pos: block,
                kind: MoveKind::Traverse,
                to_break: vec![block],
                to_place: vec![],
            },
        ];
        let mut executor = executor_over(path);
        let mut updates = BlockUpdateTracker::new();
        let agent = SimAgent::standing_at(BlockPos::new(0, 64, 0));
        executor.tick(&world, &mut updates, &agent.snapshot);
        assert_eq!(
            executor.controls().dig_target,
            Some(block),
            "digging overlaps the approach"
        );
    }

    #[test]
    fn splice_joins_at_first_shared_node_without_duplicates() {
        let a = vec![node_at(0, 64, 0), node_at(1, 64, 0), node_at(2, 64, 0), node_at(3, 64, 0)];
        let b = vec![node_at(2, 64, 0), node_at(3, 64, 0), node_at(4, 64, 0), node_at(5, 64, 0)];
        let joined = splice(&a, &b);
        let xs: Vec<i32> = joined.iter().map(|n| n.pos.x).collect();
        assert_eq!(xs, vec![0, 1, 2, 3, 4, 5]);
        for pair in joined.windows(2) {
            assert_ne!(pair[0].pos, pair[1].pos, "no duplicated node");
        }
    }

    #[test]
    fn splice_of_disjoint_paths_returns_replacement() {
        let a = vec![node_at(0, 64, 0), node_at(1, 64, 0)];
        let b = vec![node_at(9, 64, 9), node_at(9, 64, 8)];
        let joined = splice(&a, &b);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].pos, BlockPos::new(9, 64, 9));
    }

    #[test]
    fn empty_path_is_rejected() {
        let result = PathExecutor::from_path(vec![], &TravelCaps::default());
        assert!(matches!(result, Err(NavError::EmptyPath)));
    }
}
