//! Small terrain builders for deterministic scenario tests.
//!
//! Every builder produces loaded chunks only where it writes blocks;
//! anything outside the built region reads as unloaded, which is how
//! the chunk-gating paths get exercised.

use voxelnav_core::BlockPos;
use voxelnav_world::{VoxelWorld, BLOCK_AIR, BLOCK_STONE, BLOCK_WATER};

/// A flat stone plane: solid from `y = top - 3` through `top`, with
/// loaded air above, spanning `-extent..=extent` on both axes.
/// Agents stand at `top + 1`.
pub fn flat_plane(top: i32, extent: i32) -> VoxelWorld {
    let mut world = VoxelWorld::new();
    world.fill(
        BlockPos::new(-extent, top - 3, -extent),
        BlockPos::new(extent, top, extent),
        BLOCK_STONE,
    );
    world
}

/// A flat plane with the agent's start sealed inside a stone shell:
/// no move can leave the box without digging.
pub fn sealed_box(top: i32, start: BlockPos) -> VoxelWorld {
    let mut world = flat_plane(top, 16);
    for dx in -1..=1 {
        for dz in -1..=1 {
            for dy in 0..=2 {
                let pos = start.offset(dx, dy, dz);
                if pos == start || pos == start.up() {
                    continue;
                }
                world.set_block(pos, BLOCK_STONE);
            }
        }
    }
    world
}

/// A flat plane bisected by a stone wall of the given height along
/// `x = wall_x`, forcing either a climb over or a long walk around.
pub fn walled_plane(top: i32, extent: i32, wall_x: i32, wall_height: i32) -> VoxelWorld {
    let mut world = flat_plane(top, extent);
    world.fill(
        BlockPos::new(wall_x, top + 1, -extent),
        BlockPos::new(wall_x, top + wall_height, extent),
        BLOCK_STONE,
    );
    world
}

/// Two platforms separated by a bottomless gap spanning
/// `gap_min_x..=gap_max_x`; crossing requires a parkour jump or a
/// detour that does not exist.
pub fn gapped_plane(top: i32, extent: i32, gap_min_x: i32, gap_max_x: i32) -> VoxelWorld {
    let mut world = flat_plane(top, extent);
    world.fill(
        BlockPos::new(gap_min_x, top - 3, -extent),
        BlockPos::new(gap_max_x, top, extent),
        BLOCK_AIR,
    );
    world
}

/// A flat plane with a water pool carved into it: water fills
/// `y = top - 1` through `top` over the pool's XZ rectangle.
pub fn pooled_plane(top: i32, extent: i32, pool_min: BlockPos, pool_max: BlockPos) -> VoxelWorld {
    let mut world = flat_plane(top, extent);
    world.fill(
        BlockPos::new(pool_min.x, top - 1, pool_min.z),
        BlockPos::new(pool_max.x, top, pool_max.z),
        BLOCK_WATER,
    );
    world
}
