//! The read-only oracle the navigation engine consults. All methods
//! are synchronous and side-effect-free; unloaded terrain reads as
//! impassable and unbreakable so searches never route through
//! unknown space.

use crate::{BlockId, BlockTraits, DoorKind};
use voxelnav_core::BlockPos;

/// Read-only world access for pathfinding and execution.
pub trait WorldView {
    /// Block at the given position, or `None` when the terrain there
    /// is not loaded.
    fn block_at(&self, pos: BlockPos) -> Option<BlockId>;

    /// Whether the terrain containing `pos` is loaded.
    fn is_loaded(&self, pos: BlockPos) -> bool;

    /// Navigation traits for a block ID.
    fn traits_of(&self, id: BlockId) -> &BlockTraits;

    /// Whether an agent can stand on top of the block at `pos`.
    fn can_walk_on(&self, pos: BlockPos) -> bool {
        match self.block_at(pos) {
            Some(id) => self.traits_of(id).solid,
            None => false,
        }
    }

    /// Whether an agent's body can occupy the block at `pos`.
    fn can_walk_through(&self, pos: BlockPos) -> bool {
        match self.block_at(pos) {
            Some(id) => self.traits_of(id).passable,
            None => false,
        }
    }

    /// Whether the block at `pos` is water.
    fn is_water(&self, pos: BlockPos) -> bool {
        match self.block_at(pos) {
            Some(id) => self.traits_of(id).water,
            None => false,
        }
    }

    /// Whether the block at `pos` is lava.
    fn is_lava(&self, pos: BlockPos) -> bool {
        match self.block_at(pos) {
            Some(id) => self.traits_of(id).lava,
            None => false,
        }
    }

    /// Whether the block at `pos` can be climbed.
    fn is_climbable(&self, pos: BlockPos) -> bool {
        match self.block_at(pos) {
            Some(id) => self.traits_of(id).climbable,
            None => false,
        }
    }

    /// Interactable passage kind at `pos`, if any.
    fn door_kind(&self, pos: BlockPos) -> Option<DoorKind> {
        self.block_at(pos).and_then(|id| self.traits_of(id).door)
    }

    /// Break time in ticks for the block at `pos`;
    /// `f64::INFINITY` when unbreakable or unloaded.
    fn break_ticks(&self, pos: BlockPos) -> f64 {
        match self.block_at(pos) {
            Some(id) => self.traits_of(id).break_ticks(),
            None => f64::INFINITY,
        }
    }

    /// Whether both body blocks of a standing agent at `pos` are
    /// clear (feet and head).
    fn is_body_clear(&self, feet: BlockPos) -> bool {
        self.can_walk_through(feet) && self.can_walk_through(feet.up())
    }

    /// Whether `feet` is a standable position: solid footing (or
    /// water) under two clear body blocks.
    fn is_standable(&self, feet: BlockPos) -> bool {
        self.is_body_clear(feet) && (self.can_walk_on(feet.down()) || self.is_water(feet))
    }
}
