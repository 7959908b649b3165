//! Neighbor-move generation: from one standable position, enumerate
//! every physically valid transition with its tick cost and the
//! blocks that must be broken or placed to realize it.

use crate::cost::{
    fall_cost, CLIMB_DOWN_ONE_COST, CLIMB_UP_ONE_COST, DOOR_INTERACT_COST, ENTER_WATER_COST,
    EXIT_WATER_COST, JUMP_ONE_BLOCK_COST, PLACE_ONE_BLOCK_COST, SPRINT_ONE_BLOCK_COST, SQRT_2,
    SWIM_DOWN_ONE_COST, SWIM_ONE_BLOCK_COST, SWIM_UP_ONE_COST, WALK_ONE_BLOCK_COST,
    WATER_BUCKET_COST,
};
use crate::favoring::Favoring;
use serde::{Deserialize, Serialize};
use voxelnav_core::{BlockPos, CARDINALS, DIAGONALS};
use voxelnav_world::WorldView;

/// How far a fall scan will look for a landing before giving up.
const FALL_SCAN_LIMIT: i32 = 32;

/// Longest fall a water bucket can absorb.
const WATER_BUCKET_MAX_FALL: i32 = 20;

/// Kinds of discrete transitions between adjacent positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    /// Same-level cardinal step.
    Traverse,
    /// Same-level diagonal step.
    Diagonal,
    /// Step up one level (jump).
    Ascend,
    /// Step down one to three levels.
    Descend,
    /// Extended fall past the descend range.
    Fall,
    /// Sprint-jump across a horizontal gap.
    Parkour,
    /// Place a block underfoot and jump on top of it.
    Pillar,
    /// Ladder or vine climb, up or down.
    Climb,
    /// Dig straight down through the supporting block.
    MineDown,
    /// Horizontal swim.
    Swim,
    /// Swim straight up.
    SwimUp,
    /// Swim or sink straight down.
    SwimDown,
    /// Step from land into water.
    EnterWater,
    /// Haul out of water onto land.
    ExitWater,
    /// Pass through a door, gate or trapdoor.
    Door,
}

impl MoveKind {
    /// Whether this kind descends through open air, making it
    /// skippable when the agent is already falling through it.
    pub fn is_falling(self) -> bool {
        matches!(self, MoveKind::Descend | MoveKind::Fall)
    }
}

/// Capability flags and tuning for the cost model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelCaps {
    /// Whether sprint-speed costs apply to eligible moves.
    pub allow_sprint: bool,
    /// Whether parkour jumps may be generated.
    pub allow_parkour: bool,
    /// Whether blocks may be broken.
    pub can_dig: bool,
    /// Whether support blocks may be placed.
    pub can_place: bool,
    /// Whether long falls may be absorbed with a water bucket.
    pub allow_water_bucket: bool,
    /// Additive penalty on every jump, to discourage hopping.
    pub jump_penalty: f64,
    /// Deepest fall accepted without water below.
    pub max_fall: i32,
}

impl Default for TravelCaps {
    fn default() -> Self {
        Self {
            allow_sprint: true,
            allow_parkour: true,
            can_dig: true,
            can_place: true,
            allow_water_bucket: false,
            jump_penalty: 0.0,
            max_fall: 3,
        }
    }
}

/// A candidate transition out of a search node.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Destination feet position.
    pub dest: BlockPos,
    /// Tick cost including break/place work and favoring.
    pub cost: f64,
    /// Transition kind.
    pub kind: MoveKind,
    /// Blocks that must be broken first.
    pub to_break: Vec<BlockPos>,
    /// Block spaces that must be filled first.
    pub to_place: Vec<BlockPos>,
}

/// Enumerates valid neighbor transitions for the search engine.
pub struct MoveGenerator<'a, W: WorldView> {
    world: &'a W,
    caps: &'a TravelCaps,
    favoring: &'a Favoring,
}

impl<'a, W: WorldView> MoveGenerator<'a, W> {
    /// Create a generator over the given world, capabilities and
    /// favoring table.
    pub fn new(world: &'a W, caps: &'a TravelCaps, favoring: &'a Favoring) -> Self {
        Self {
            world,
            caps,
            favoring,
        }
    }

    /// Append every valid transition out of `pos` to `out`.
    pub fn neighbors(&self, pos: BlockPos, out: &mut Vec<Edge>) {
        let in_water = self.world.is_water(pos);
        for (dx, dz) in CARDINALS {
            if in_water {
                self.swim_moves(pos, dx, dz, out);
            } else {
                self.cardinal_moves(pos, dx, dz, out);
            }
        }
        if !in_water {
            for (dx, dz) in DIAGONALS {
                self.diagonal_move(pos, dx, dz, out);
            }
        }
        self.vertical_moves(pos, in_water, out);
    }

    fn base_step_cost(&self) -> f64 {
        if self.caps.allow_sprint {
            SPRINT_ONE_BLOCK_COST
        } else {
            WALK_ONE_BLOCK_COST
        }
    }

    fn push(&self, out: &mut Vec<Edge>, mut edge: Edge) {
        edge.cost *= self.favoring.get(edge.dest);
        out.push(edge);
    }

    /// Break work needed to clear the two body blocks at `feet`.
    ///
    /// `Some((blocks, ticks))` when the body space is clear or can be
    /// dug clear; `None` when it is blocked for good.
    fn body_clearance(&self, feet: BlockPos) -> Option<(Vec<BlockPos>, f64)> {
        let mut to_break = Vec::new();
        let mut ticks = 0.0;
        for block in [feet, feet.up()] {
            if self.world.is_lava(block) {
                return None;
            }
            if self.world.can_walk_through(block) {
                continue;
            }
            if !self.caps.can_dig {
                return None;
            }
            let break_ticks = self.world.break_ticks(block);
            if !break_ticks.is_finite() {
                return None;
            }
            to_break.push(block);
            ticks += break_ticks;
        }
        Some((to_break, ticks))
    }

    fn cardinal_moves(&self, pos: BlockPos, dx: i32, dz: i32, out: &mut Vec<Edge>) {
        let dest = pos.offset(dx, 0, dz);
        let base = self.base_step_cost();

        // Door/gate/trapdoor passage gets its own kind and an
        // interaction surcharge; iron doors fail the passability
        // check and are never generated.
        let door = self
            .world
            .door_kind(dest)
            .or_else(|| self.world.door_kind(dest.up()));
        if let Some(kind) = door {
            if kind.openable_by_hand()
                && self.world.is_body_clear(dest)
                && self.world.can_walk_on(dest.down())
            {
                self.push(
                    out,
                    Edge {
                        dest,
                        cost: WALK_ONE_BLOCK_COST + DOOR_INTERACT_COST,
                        kind: MoveKind::Door,
                        to_break: vec![],
                        to_place: vec![],
                    },
                );
            }
            return;
        }

        if let Some((to_break, break_ticks)) = self.body_clearance(dest) {
            if self.world.is_water(dest) && to_break.is_empty() {
                self.push(
                    out,
                    Edge {
                        dest,
                        cost: SWIM_ONE_BLOCK_COST + ENTER_WATER_COST,
                        kind: MoveKind::EnterWater,
                        to_break: vec![],
                        to_place: vec![],
                    },
                );
            } else if self.world.can_walk_on(dest.down()) {
                // Breaking implies stopping; only clear paths move at
                // sprint cost.
                let step = if to_break.is_empty() { base } else { WALK_ONE_BLOCK_COST };
                self.push(
                    out,
                    Edge {
                        dest,
                        cost: step + break_ticks,
                        kind: MoveKind::Traverse,
                        to_break,
                        to_place: vec![],
                    },
                );
            } else if to_break.is_empty() {
                self.descend_moves(dest, out);
                self.parkour_moves(pos, dx, dz, out);
            }
        }

        self.ascend_move(pos, dx, dz, out);
    }

    fn ascend_move(&self, pos: BlockPos, dx: i32, dz: i32, out: &mut Vec<Edge>) {
        let dest = pos.offset(dx, 1, dz);
        // The block stepped onto.
        if !self.world.can_walk_on(dest.down()) {
            return;
        }
        let head = pos.offset(0, 2, 0);
        let mut to_break = Vec::new();
        let mut break_ticks = 0.0;
        if !self.world.can_walk_through(head) {
            if !self.caps.can_dig {
                return;
            }
            let ticks = self.world.break_ticks(head);
            if !ticks.is_finite() {
                return;
            }
            to_break.push(head);
            break_ticks += ticks;
        }
        let Some((body_breaks, body_ticks)) = self.body_clearance(dest) else {
            return;
        };
        to_break.extend(body_breaks);
        break_ticks += body_ticks;
        let step = if to_break.is_empty() {
            self.base_step_cost()
        } else {
            WALK_ONE_BLOCK_COST
        };
        self.push(
            out,
            Edge {
                dest,
                cost: step + JUMP_ONE_BLOCK_COST + self.caps.jump_penalty + break_ticks,
                kind: MoveKind::Ascend,
                to_break,
                to_place: vec![],
            },
        );
    }

    fn descend_moves(&self, dest: BlockPos, out: &mut Vec<Edge>) {
        let base = self.base_step_cost();
        let mut feet = dest;
        let mut drop = 0;
        loop {
            if self.world.is_water(feet) {
                if drop == 0 {
                    return; // handled as EnterWater
                }
                self.push(
                    out,
                    Edge {
                        dest: feet,
                        cost: base + fall_cost(drop) + ENTER_WATER_COST,
                        kind: if drop <= 3 { MoveKind::Descend } else { MoveKind::Fall },
                        to_break: vec![],
                        to_place: vec![],
                    },
                );
                return;
            }
            if self.world.can_walk_on(feet.down()) {
                if drop == 0 {
                    return; // plain traverse, not a descend
                }
                let mut cost = base + fall_cost(drop);
                let mut to_place = Vec::new();
                if drop > self.caps.max_fall {
                    if self.caps.allow_water_bucket && drop <= WATER_BUCKET_MAX_FALL {
                        cost += WATER_BUCKET_COST;
                        to_place.push(feet);
                    } else {
                        return;
                    }
                }
                self.push(
                    out,
                    Edge {
                        dest: feet,
                        cost,
                        kind: if drop <= 3 { MoveKind::Descend } else { MoveKind::Fall },
                        to_break: vec![],
                        to_place,
                    },
                );
                return;
            }
            let next = feet.down();
            if self.world.is_lava(next) || !self.world.can_walk_through(next) {
                return;
            }
            feet = next;
            drop += 1;
            if drop > FALL_SCAN_LIMIT {
                return;
            }
        }
    }

    fn parkour_moves(&self, pos: BlockPos, dx: i32, dz: i32, out: &mut Vec<Edge>) {
        if !self.caps.allow_parkour {
            return;
        }
        // Head room for the jump arc at the origin.
        if !self.world.can_walk_through(pos.offset(0, 2, 0)) {
            return;
        }
        let max_gap = if self.caps.allow_sprint { 4 } else { 3 };
        for step in 1..max_gap {
            let cell = pos.offset(dx * step, 0, dz * step);
            // Flight path must be clear, and a standable intermediate
            // means walking is possible instead.
            if !self.world.is_body_clear(cell)
                || !self.world.can_walk_through(cell.offset(0, 2, 0))
                || self.world.can_walk_on(cell.down())
                || self.world.is_water(cell)
            {
                return;
            }
            let gap = step + 1;
            let landing = pos.offset(dx * gap, 0, dz * gap);
            if self.world.is_body_clear(landing)
                && self.world.can_walk_on(landing.down())
                && !self.world.is_water(landing)
            {
                self.push(
                    out,
                    Edge {
                        dest: landing,
                        cost: JUMP_ONE_BLOCK_COST
                            + gap as f64 * SPRINT_ONE_BLOCK_COST
                            + self.caps.jump_penalty,
                        kind: MoveKind::Parkour,
                        to_break: vec![],
                        to_place: vec![],
                    },
                );
                return;
            }
        }
    }

    fn diagonal_move(&self, pos: BlockPos, dx: i32, dz: i32, out: &mut Vec<Edge>) {
        let dest = pos.offset(dx, 0, dz);
        if !self.world.is_body_clear(dest)
            || !self.world.can_walk_on(dest.down())
            || self.world.is_water(dest)
            || self.world.door_kind(dest).is_some()
        {
            return;
        }
        // At least one of the two corner-cutting paths must be open.
        let corner_a = pos.offset(dx, 0, 0);
        let corner_b = pos.offset(0, 0, dz);
        if !self.world.is_body_clear(corner_a) && !self.world.is_body_clear(corner_b) {
            return;
        }
        self.push(
            out,
            Edge {
                dest,
                cost: self.base_step_cost() * SQRT_2,
                kind: MoveKind::Diagonal,
                to_break: vec![],
                to_place: vec![],
            },
        );
    }

    fn swim_moves(&self, pos: BlockPos, dx: i32, dz: i32, out: &mut Vec<Edge>) {
        let dest = pos.offset(dx, 0, dz);
        if self.world.is_lava(dest) {
            return;
        }
        if self.world.is_water(dest) && self.world.can_walk_through(dest.up()) {
            self.push(
                out,
                Edge {
                    dest,
                    cost: SWIM_ONE_BLOCK_COST,
                    kind: MoveKind::Swim,
                    to_break: vec![],
                    to_place: vec![],
                },
            );
            return;
        }
        // Hauling out onto land, level or one up.
        if self.world.is_body_clear(dest) && self.world.can_walk_on(dest.down()) {
            self.push(
                out,
                Edge {
                    dest,
                    cost: SWIM_ONE_BLOCK_COST + EXIT_WATER_COST,
                    kind: MoveKind::ExitWater,
                    to_break: vec![],
                    to_place: vec![],
                },
            );
            return;
        }
        let up = pos.offset(dx, 1, dz);
        if self.world.is_body_clear(up)
            && self.world.can_walk_on(up.down())
            && self.world.can_walk_through(pos.offset(0, 2, 0))
        {
            self.push(
                out,
                Edge {
                    dest: up,
                    cost: SWIM_ONE_BLOCK_COST + EXIT_WATER_COST + JUMP_ONE_BLOCK_COST,
                    kind: MoveKind::ExitWater,
                    to_break: vec![],
                    to_place: vec![],
                },
            );
        }
    }

    fn vertical_moves(&self, pos: BlockPos, in_water: bool, out: &mut Vec<Edge>) {
        let up = pos.up();
        let below = pos.down();

        if in_water {
            if self.world.is_water(up) || self.world.can_walk_through(up.up()) {
                self.push(
                    out,
                    Edge {
                        dest: up,
                        cost: SWIM_UP_ONE_COST,
                        kind: MoveKind::SwimUp,
                        to_break: vec![],
                        to_place: vec![],
                    },
                );
            }
            if self.world.is_water(below) {
                self.push(
                    out,
                    Edge {
                        dest: below,
                        cost: SWIM_DOWN_ONE_COST,
                        kind: MoveKind::SwimDown,
                        to_break: vec![],
                        to_place: vec![],
                    },
                );
            }
            return;
        }

        // Ladder/vine climbing.
        if self.world.is_climbable(pos) || self.world.is_climbable(up) {
            if self.world.can_walk_through(pos.offset(0, 2, 0)) {
                self.push(
                    out,
                    Edge {
                        dest: up,
                        cost: CLIMB_UP_ONE_COST,
                        kind: MoveKind::Climb,
                        to_break: vec![],
                        to_place: vec![],
                    },
                );
            }
        } else if self.caps.can_place && self.world.can_walk_on(below) {
            // Pillar: jump and place a block where the feet were.
            let head = pos.offset(0, 2, 0);
            let mut to_break = Vec::new();
            let mut break_ticks = 0.0;
            let head_ok = if self.world.can_walk_through(head) {
                true
            } else if self.caps.can_dig && self.world.break_ticks(head).is_finite() {
                to_break.push(head);
                break_ticks = self.world.break_ticks(head);
                true
            } else {
                false
            };
            if head_ok {
                self.push(
                    out,
                    Edge {
                        dest: up,
                        cost: JUMP_ONE_BLOCK_COST
                            + PLACE_ONE_BLOCK_COST
                            + self.caps.jump_penalty
                            + break_ticks,
                        kind: MoveKind::Pillar,
                        to_break,
                        to_place: vec![pos],
                    },
                );
            }
        }

        if self.world.is_climbable(below) {
            self.push(
                out,
                Edge {
                    dest: below,
                    cost: CLIMB_DOWN_ONE_COST,
                    kind: MoveKind::Climb,
                    to_break: vec![],
                    to_place: vec![],
                },
            );
        } else if self.caps.can_dig
            && !self.world.can_walk_through(below)
            && !self.world.is_lava(below)
            && self.world.can_walk_on(pos.offset(0, -2, 0))
        {
            let break_ticks = self.world.break_ticks(below);
            if break_ticks.is_finite() {
                self.push(
                    out,
                    Edge {
                        dest: below,
                        cost: break_ticks + fall_cost(1),
                        kind: MoveKind::MineDown,
                        to_break: vec![below],
                        to_place: vec![],
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelnav_testkit::flat_plane;
    use voxelnav_world::{VoxelWorld, BLOCK_LADDER, BLOCK_OAK_DOOR, BLOCK_STONE, BLOCK_WATER};

    fn flat_world() -> VoxelWorld {
        flat_plane(63, 16)
    }

    fn edges_from(world: &VoxelWorld, caps: &TravelCaps, pos: BlockPos) -> Vec<Edge> {
        let favoring = Favoring::new();
        let generator = MoveGenerator::new(world, caps, &favoring);
        let mut out = Vec::new();
        generator.neighbors(pos, &mut out);
        out
    }

    #[test]
    fn open_plane_generates_cardinals_and_diagonals() {
        let world = flat_world();
        let caps = TravelCaps::default();
        let edges = edges_from(&world, &caps, BlockPos::new(0, 64, 0));
        let traverses = edges
            .iter()
            .filter(|e| e.kind == MoveKind::Traverse)
            .count();
        let diagonals = edges
            .iter()
            .filter(|e| e.kind == MoveKind::Diagonal)
            .count();
        assert_eq!(traverses, 4);
        assert_eq!(diagonals, 4);
    }

    #[test]
    fn diagonal_costs_sqrt_two_times_cardinal() {
        let world = flat_world();
        let caps = TravelCaps::default();
        let edges = edges_from(&world, &caps, BlockPos::new(0, 64, 0));
        let cardinal = edges
            .iter()
            .find(|e| e.kind == MoveKind::Traverse)
            .expect("cardinal edge");
        let diagonal = edges
            .iter()
            .find(|e| e.kind == MoveKind::Diagonal)
            .expect("diagonal edge");
        assert!((diagonal.cost - cardinal.cost * SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn ascend_requires_head_room() {
        let mut world = flat_world();
        // A one-block step up to the east.
        world.set_block(BlockPos::new(1, 64, 0), BLOCK_STONE);
        let caps = TravelCaps {
            can_dig: false,
            ..TravelCaps::default()
        };
        let edges = edges_from(&world, &caps, BlockPos::new(0, 64, 0));
        assert!(edges
            .iter()
            .any(|e| e.kind == MoveKind::Ascend && e.dest == BlockPos::new(1, 65, 0)));

        // Cap the origin's head space; the ascend disappears.
        world.set_block(BlockPos::new(0, 66, 0), BLOCK_STONE);
        let edges = edges_from(&world, &caps, BlockPos::new(0, 64, 0));
        assert!(!edges.iter().any(|e| e.kind == MoveKind::Ascend));
    }

    #[test]
    fn blocked_body_generates_break_list_when_digging_allowed() {
        let mut world = flat_world();
        world.set_block(BlockPos::new(1, 64, 0), BLOCK_STONE);
        world.set_block(BlockPos::new(1, 65, 0), BLOCK_STONE);
        world.set_block(BlockPos::new(1, 66, 0), BLOCK_STONE);

        let digging = TravelCaps::default();
        let edges = edges_from(&world, &digging, BlockPos::new(0, 64, 0));
        let through = edges
            .iter()
            .find(|e| e.kind == MoveKind::Traverse && e.dest == BlockPos::new(1, 64, 0))
            .expect("dig-through traverse");
        assert_eq!(through.to_break.len(), 2);
        assert!(through.cost > WALK_ONE_BLOCK_COST);

        let no_dig = TravelCaps {
            can_dig: false,
            ..TravelCaps::default()
        };
        let edges = edges_from(&world, &no_dig, BlockPos::new(0, 64, 0));
        assert!(!edges
            .iter()
            .any(|e| e.dest == BlockPos::new(1, 64, 0)));
    }

    #[test]
    fn descend_finds_landing_within_max_fall() {
        let mut world = VoxelWorld::new();
        // Upper shelf at y=63 support, lower ground at y=60.
        world.fill(
            BlockPos::new(-8, 60, -8),
            BlockPos::new(8, 60, 8),
            BLOCK_STONE,
        );
        world.fill(
            BlockPos::new(-8, 61, -8),
            BlockPos::new(0, 63, 8),
            BLOCK_STONE,
        );
        let caps = TravelCaps::default();
        let edges = edges_from(&world, &caps, BlockPos::new(0, 64, 0));
        let descend = edges
            .iter()
            .find(|e| e.kind == MoveKind::Descend && e.dest == BlockPos::new(1, 61, 0))
            .expect("descend edge");
        assert!(descend.cost > 0.0);
    }

    #[test]
    fn deep_fall_rejected_without_water() {
        let mut world = VoxelWorld::new();
        world.fill(
            BlockPos::new(-8, 50, -8),
            BlockPos::new(8, 50, 8),
            BLOCK_STONE,
        );
        world.fill(
            BlockPos::new(-8, 51, -8),
            BlockPos::new(0, 63, 8),
            BLOCK_STONE,
        );
        let caps = TravelCaps::default();
        let edges = edges_from(&world, &caps, BlockPos::new(0, 64, 0));
        assert!(!edges
            .iter()
            .any(|e| matches!(e.kind, MoveKind::Descend | MoveKind::Fall) && e.dest.x == 1));

        // The same drop into a water pool is fine.
        world.set_block(BlockPos::new(1, 51, 0), BLOCK_WATER);
        let edges = edges_from(&world, &caps, BlockPos::new(0, 64, 0));
        assert!(edges
            .iter()
            .any(|e| e.kind == MoveKind::Fall && e.dest == BlockPos::new(1, 51, 0)));
    }

    #[test]
    fn parkour_spans_gap_when_enabled() {
        let mut world = VoxelWorld::new();
        world.fill(
            BlockPos::new(-4, 63, -4),
            BlockPos::new(0, 63, 4),
            BLOCK_STONE,
        );
        // Landing platform across a two-block gap.
        world.fill(
            BlockPos::new(3, 63, -4),
            BlockPos::new(6, 63, 4),
            BLOCK_STONE,
        );
        let caps = TravelCaps::default();
        let edges = edges_from(&world, &caps, BlockPos::new(0, 64, 0));
        assert!(edges
            .iter()
            .any(|e| e.kind == MoveKind::Parkour && e.dest == BlockPos::new(3, 64, 0)));

        let no_parkour = TravelCaps {
            allow_parkour: false,
            ..TravelCaps::default()
        };
        let edges = edges_from(&world, &no_parkour, BlockPos::new(0, 64, 0));
        assert!(!edges.iter().any(|e| e.kind == MoveKind::Parkour));
    }

    #[test]
    fn pillar_places_block_underfoot() {
        let world = flat_world();
        let caps = TravelCaps::default();
        let edges = edges_from(&world, &caps, BlockPos::new(0, 64, 0));
        let pillar = edges
            .iter()
            .find(|e| e.kind == MoveKind::Pillar)
            .expect("pillar edge");
        assert_eq!(pillar.dest, BlockPos::new(0, 65, 0));
        assert_eq!(pillar.to_place, vec![BlockPos::new(0, 64, 0)]);

        let no_place = TravelCaps {
            can_place: false,
            ..TravelCaps::default()
        };
        let edges = edges_from(&world, &no_place, BlockPos::new(0, 64, 0));
        assert!(!edges.iter().any(|e| e.kind == MoveKind::Pillar));
    }

    #[test]
    fn ladder_climb_replaces_pillar() {
        let mut world = flat_world();
        world.set_block(BlockPos::new(0, 64, 0), BLOCK_LADDER);
        world.set_block(BlockPos::new(0, 65, 0), BLOCK_LADDER);
        let caps = TravelCaps::default();
        let edges = edges_from(&world, &caps, BlockPos::new(0, 64, 0));
        assert!(edges
            .iter()
            .any(|e| e.kind == MoveKind::Climb && e.dest == BlockPos::new(0, 65, 0)));
        assert!(!edges.iter().any(|e| e.kind == MoveKind::Pillar));
    }

    #[test]
    fn wooden_door_passage_costs_interaction() {
        let mut world = flat_world();
        world.set_block(BlockPos::new(1, 64, 0), BLOCK_OAK_DOOR);
        world.set_block(BlockPos::new(1, 65, 0), BLOCK_OAK_DOOR);
        let caps = TravelCaps::default();
        let edges = edges_from(&world, &caps, BlockPos::new(0, 64, 0));
        let door = edges
            .iter()
            .find(|e| e.kind == MoveKind::Door && e.dest == BlockPos::new(1, 64, 0))
            .expect("door edge");
        assert!((door.cost - (WALK_ONE_BLOCK_COST + DOOR_INTERACT_COST)).abs() < 1e-9);
    }

    #[test]
    fn swimming_moves_generated_in_water() {
        let mut world = VoxelWorld::new();
        world.fill(
            BlockPos::new(-4, 60, -4),
            BlockPos::new(4, 60, 4),
            BLOCK_STONE,
        );
        world.fill(
            BlockPos::new(-4, 61, -4),
            BlockPos::new(4, 63, 4),
            BLOCK_WATER,
        );
        let caps = TravelCaps::default();
        let edges = edges_from(&world, &caps, BlockPos::new(0, 62, 0));
        assert!(edges.iter().any(|e| e.kind == MoveKind::Swim));
        assert!(edges
            .iter()
            .any(|e| e.kind == MoveKind::SwimUp && e.dest == BlockPos::new(0, 63, 0)));
        assert!(edges
            .iter()
            .any(|e| e.kind == MoveKind::SwimDown && e.dest == BlockPos::new(0, 61, 0)));
    }

    #[test]
    fn favoring_scales_edge_cost() {
        let world = flat_world();
        let caps = TravelCaps::default();
        let mut favoring = Favoring::new();
        favoring.apply(BlockPos::new(1, 64, 0), 2.0);
        let generator = MoveGenerator::new(&world, &caps, &favoring);
        let mut out = Vec::new();
        generator.neighbors(BlockPos::new(0, 64, 0), &mut out);
        let east = out
            .iter()
            .find(|e| e.dest == BlockPos::new(1, 64, 0))
            .expect("east edge");
        let north = out
            .iter()
            .find(|e| e.dest == BlockPos::new(0, 64, 1))
            .expect("north edge");
        assert!((east.cost - north.cost * 2.0).abs() < 1e-9);
    }
}
