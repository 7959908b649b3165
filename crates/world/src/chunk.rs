use serde::{Deserialize, Serialize};
use voxelnav_core::BlockPos;

/// Chunk width (X axis) in voxels.
pub const CHUNK_SIZE_X: usize = 16;
/// Chunk height (Y axis) in voxels.
pub const CHUNK_SIZE_Y: usize = 256;
/// Chunk depth (Z axis) in voxels.
pub const CHUNK_SIZE_Z: usize = 16;
/// Total voxel count per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z;

/// Block identifier referencing the trait registry.
pub type BlockId = u16;

/// Reserved ID for air.
pub const BLOCK_AIR: BlockId = 0;
/// ID for stone.
pub const BLOCK_STONE: BlockId = 1;
/// ID for dirt.
pub const BLOCK_DIRT: BlockId = 2;
/// ID for grass blocks.
pub const BLOCK_GRASS: BlockId = 3;
/// ID for bedrock (unbreakable).
pub const BLOCK_BEDROCK: BlockId = 4;
/// ID for still water.
pub const BLOCK_WATER: BlockId = 5;
/// ID for lava (never entered by the engine).
pub const BLOCK_LAVA: BlockId = 6;
/// ID for sand.
pub const BLOCK_SAND: BlockId = 7;
/// ID for gravel.
pub const BLOCK_GRAVEL: BlockId = 8;
/// ID for cobblestone (the default placement block).
pub const BLOCK_COBBLESTONE: BlockId = 9;
/// ID for ladders (climbable, non-solid).
pub const BLOCK_LADDER: BlockId = 10;
/// ID for vines (climbable, non-solid).
pub const BLOCK_VINE: BlockId = 11;
/// ID for wooden doors (openable by hand).
pub const BLOCK_OAK_DOOR: BlockId = 12;
/// ID for iron doors (unopenable without redstone).
pub const BLOCK_IRON_DOOR: BlockId = 13;
/// ID for fence gates.
pub const BLOCK_FENCE_GATE: BlockId = 14;
/// ID for trapdoors.
pub const BLOCK_TRAPDOOR: BlockId = 15;
/// ID for tall grass (instantly breakable soft cover).
pub const BLOCK_TALL_GRASS: BlockId = 16;
/// ID for obsidian (very slow to break).
pub const BLOCK_OBSIDIAN: BlockId = 17;

/// Coordinates of a chunk column in the world grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ChunkPos {
    /// Chunk X coordinate (world X / 16).
    pub x: i32,
    /// Chunk Z coordinate (world Z / 16).
    pub z: i32,
}

impl ChunkPos {
    /// Create a chunk position.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk column containing the given block position.
    pub const fn containing(pos: BlockPos) -> Self {
        Self {
            x: pos.x.div_euclid(CHUNK_SIZE_X as i32),
            z: pos.z.div_euclid(CHUNK_SIZE_Z as i32),
        }
    }
}

/// A 16x256x16 column of blocks.
#[derive(Debug, Clone)]
pub struct Chunk {
    blocks: Vec<BlockId>,
}

impl Chunk {
    /// Create a chunk filled with air.
    pub fn empty() -> Self {
        Self {
            blocks: vec![BLOCK_AIR; CHUNK_VOLUME],
        }
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        (y * CHUNK_SIZE_Z + z) * CHUNK_SIZE_X + x
    }

    /// Block at the chunk-local coordinate. Returns air for
    /// out-of-range Y so callers don't need to bounds-check.
    pub fn block(&self, x: usize, y: usize, z: usize) -> BlockId {
        if x >= CHUNK_SIZE_X || y >= CHUNK_SIZE_Y || z >= CHUNK_SIZE_Z {
            return BLOCK_AIR;
        }
        self.blocks[Self::index(x, y, z)]
    }

    /// Set the block at the chunk-local coordinate, returning the
    /// previous ID. Out-of-range writes are ignored.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, id: BlockId) -> BlockId {
        if x >= CHUNK_SIZE_X || y >= CHUNK_SIZE_Y || z >= CHUNK_SIZE_Z {
            return BLOCK_AIR;
        }
        let slot = &mut self.blocks[Self::index(x, y, z)];
        std::mem::replace(slot, id)
    }
}
