//! In-memory chunked voxel world implementing [`WorldView`].

use crate::{
    BlockId, BlockRegistry, BlockTraits, BlockUpdateTracker, Chunk, ChunkPos, ChunkTracker,
    WorldView, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z,
};
use std::collections::BTreeMap;
use voxelnav_core::BlockPos;

/// A mutable chunked world backing the engine in tests and the
/// headless runner. Production hosts supply their own [`WorldView`].
pub struct VoxelWorld {
    chunks: BTreeMap<ChunkPos, Chunk>,
    registry: BlockRegistry,
    chunk_tracker: ChunkTracker,
}

impl VoxelWorld {
    /// Create an empty world with the built-in block registry.
    pub fn new() -> Self {
        Self {
            chunks: BTreeMap::new(),
            registry: BlockRegistry::new(),
            chunk_tracker: ChunkTracker::new(),
        }
    }

    /// Load an air-filled chunk at the given column (no-op when
    /// already loaded).
    pub fn load_chunk(&mut self, pos: ChunkPos) {
        self.chunks.entry(pos).or_insert_with(Chunk::empty);
        self.chunk_tracker.mark_loaded(pos);
    }

    /// Unload a chunk column, discarding its blocks.
    pub fn unload_chunk(&mut self, pos: ChunkPos) {
        self.chunks.remove(&pos);
        self.chunk_tracker.mark_unloaded(pos);
    }

    /// The chunk-load tracker for this world.
    pub fn chunk_tracker(&self) -> &ChunkTracker {
        &self.chunk_tracker
    }

    fn local(pos: BlockPos) -> Option<(ChunkPos, usize, usize, usize)> {
        if pos.y < 0 || pos.y >= CHUNK_SIZE_Y as i32 {
            return None;
        }
        let chunk = ChunkPos::containing(pos);
        let lx = pos.x.rem_euclid(CHUNK_SIZE_X as i32) as usize;
        let lz = pos.z.rem_euclid(CHUNK_SIZE_Z as i32) as usize;
        Some((chunk, lx, pos.y as usize, lz))
    }

    /// Set a block, returning the previous ID when the chunk is
    /// loaded and the position in range.
    pub fn set_block(&mut self, pos: BlockPos, id: BlockId) -> Option<BlockId> {
        let (chunk_pos, lx, ly, lz) = Self::local(pos)?;
        let chunk = self.chunks.get_mut(&chunk_pos)?;
        Some(chunk.set_block(lx, ly, lz, id))
    }

    /// Set a block and record the mutation with the update tracker.
    pub fn set_block_tracked(
        &mut self,
        pos: BlockPos,
        id: BlockId,
        updates: &mut BlockUpdateTracker,
    ) -> Option<BlockId> {
        let old = self.set_block(pos, id)?;
        if old != id {
            updates.record(pos);
        }
        Some(old)
    }

    /// Fill an axis-aligned box (inclusive bounds) with a block,
    /// loading any chunks the box touches.
    pub fn fill(&mut self, min: BlockPos, max: BlockPos, id: BlockId) {
        for x in min.x..=max.x {
            for z in min.z..=max.z {
                let column = BlockPos::new(x, 0, z);
                self.load_chunk(ChunkPos::containing(column));
                for y in min.y..=max.y {
                    self.set_block(BlockPos::new(x, y, z), id);
                }
            }
        }
    }
}

impl Default for VoxelWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldView for VoxelWorld {
    fn block_at(&self, pos: BlockPos) -> Option<BlockId> {
        let (chunk_pos, lx, ly, lz) = Self::local(pos)?;
        let chunk = self.chunks.get(&chunk_pos)?;
        Some(chunk.block(lx, ly, lz))
    }

    fn is_loaded(&self, pos: BlockPos) -> bool {
        self.chunk_tracker.is_block_loaded(pos)
    }

    fn traits_of(&self, id: BlockId) -> &BlockTraits {
        self.registry.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BLOCK_STONE, BLOCK_WATER};

    #[test]
    fn unloaded_terrain_reads_as_none_and_impassable() {
        let world = VoxelWorld::new();
        let pos = BlockPos::new(0, 64, 0);
        assert_eq!(world.block_at(pos), None);
        assert!(!world.is_loaded(pos));
        assert!(!world.can_walk_through(pos));
        assert!(world.break_ticks(pos).is_infinite());
    }

    #[test]
    fn fill_creates_standable_ground() {
        let mut world = VoxelWorld::new();
        world.fill(
            BlockPos::new(-4, 63, -4),
            BlockPos::new(4, 63, 4),
            BLOCK_STONE,
        );
        let feet = BlockPos::new(0, 64, 0);
        assert!(world.is_standable(feet));
        assert!(world.can_walk_on(feet.down()));
        assert!(world.is_body_clear(feet));
    }

    #[test]
    fn tracked_writes_record_updates_only_on_change() {
        let mut world = VoxelWorld::new();
        let mut updates = BlockUpdateTracker::new();
        let pos = BlockPos::new(2, 64, 2);
        world.load_chunk(ChunkPos::containing(pos));
        world.set_block_tracked(pos, BLOCK_WATER, &mut updates);
        world.set_block_tracked(pos, BLOCK_WATER, &mut updates);
        assert_eq!(updates.drain(), vec![pos]);
    }

    #[test]
    fn water_counts_as_standable_support() {
        let mut world = VoxelWorld::new();
        let pos = BlockPos::new(1, 64, 1);
        world.load_chunk(ChunkPos::containing(pos));
        world.set_block(pos, BLOCK_WATER);
        assert!(world.is_water(pos));
        assert!(world.is_standable(pos));
    }
}
