//! Block traits relevant to navigation: standing, passage, fluids,
//! climbing, doors, and breakage.

use crate::{
    BlockId, BLOCK_AIR, BLOCK_BEDROCK, BLOCK_COBBLESTONE, BLOCK_DIRT, BLOCK_FENCE_GATE,
    BLOCK_GRASS, BLOCK_GRAVEL, BLOCK_IRON_DOOR, BLOCK_LADDER, BLOCK_LAVA, BLOCK_OAK_DOOR,
    BLOCK_OBSIDIAN, BLOCK_SAND, BLOCK_STONE, BLOCK_TALL_GRASS, BLOCK_TRAPDOOR, BLOCK_VINE,
    BLOCK_WATER,
};

/// Ticks-per-second of the simulation; hardness is specified in
/// seconds, breakage is consumed in ticks.
const TICKS_PER_SECOND: f64 = 20.0;

/// Kinds of interactable passage blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorKind {
    /// Wooden door, openable by hand.
    Wood,
    /// Iron door, unopenable without redstone.
    Iron,
    /// Fence gate.
    Gate,
    /// Trapdoor.
    Trapdoor,
}

impl DoorKind {
    /// Whether an agent can open this passage by hand.
    pub fn openable_by_hand(self) -> bool {
        !matches!(self, DoorKind::Iron)
    }
}

/// Navigation-relevant properties of a block type.
#[derive(Debug, Clone)]
pub struct BlockTraits {
    /// Whether an agent can stand on top of this block.
    pub solid: bool,
    /// Whether an agent's body can occupy this block's space.
    pub passable: bool,
    /// Whether this block is water.
    pub water: bool,
    /// Whether this block is lava (a hard hazard).
    pub lava: bool,
    /// Whether this block can be climbed (ladder/vine).
    pub climbable: bool,
    /// Interactable passage kind, if any.
    pub door: Option<DoorKind>,
    /// Base break time in seconds; ignored when `unbreakable`.
    pub hardness: f32,
    /// Whether this block can never be broken.
    pub unbreakable: bool,
}

impl Default for BlockTraits {
    fn default() -> Self {
        Self {
            solid: true,
            passable: false,
            water: false,
            lava: false,
            climbable: false,
            door: None,
            hardness: 1.5,
            unbreakable: false,
        }
    }
}

impl BlockTraits {
    fn air() -> Self {
        Self {
            solid: false,
            passable: true,
            hardness: 0.0,
            ..Self::default()
        }
    }

    fn water() -> Self {
        Self {
            solid: false,
            passable: true,
            water: true,
            hardness: 0.0,
            ..Self::default()
        }
    }

    fn lava() -> Self {
        Self {
            solid: false,
            passable: false,
            lava: true,
            hardness: 0.0,
            ..Self::default()
        }
    }

    fn climbable() -> Self {
        Self {
            solid: false,
            passable: true,
            climbable: true,
            hardness: 0.4,
            ..Self::default()
        }
    }

    fn door(kind: DoorKind) -> Self {
        Self {
            solid: false,
            passable: kind.openable_by_hand(),
            door: Some(kind),
            hardness: 3.0,
            ..Self::default()
        }
    }

    fn soft() -> Self {
        Self {
            solid: false,
            passable: true,
            hardness: 0.0,
            ..Self::default()
        }
    }

    fn stone(hardness: f32) -> Self {
        Self {
            hardness,
            ..Self::default()
        }
    }

    fn unbreakable() -> Self {
        Self {
            unbreakable: true,
            hardness: f32::INFINITY,
            ..Self::default()
        }
    }

    /// Break time in simulation ticks, or `f64::INFINITY` when the
    /// block cannot be broken.
    pub fn break_ticks(&self) -> f64 {
        if self.unbreakable {
            return f64::INFINITY;
        }
        f64::from(self.hardness) * TICKS_PER_SECOND
    }
}

/// Registry mapping block IDs to their navigation traits.
pub struct BlockRegistry {
    traits: Vec<BlockTraits>,
}

impl BlockRegistry {
    /// Create a registry covering the built-in block set.
    pub fn new() -> Self {
        let mut traits = vec![BlockTraits::default(); 256];

        traits[BLOCK_AIR as usize] = BlockTraits::air();
        traits[BLOCK_STONE as usize] = BlockTraits::stone(1.5);
        traits[BLOCK_DIRT as usize] = BlockTraits::stone(0.5);
        traits[BLOCK_GRASS as usize] = BlockTraits::stone(0.6);
        traits[BLOCK_BEDROCK as usize] = BlockTraits::unbreakable();
        traits[BLOCK_WATER as usize] = BlockTraits::water();
        traits[BLOCK_LAVA as usize] = BlockTraits::lava();
        traits[BLOCK_SAND as usize] = BlockTraits::stone(0.5);
        traits[BLOCK_GRAVEL as usize] = BlockTraits::stone(0.6);
        traits[BLOCK_COBBLESTONE as usize] = BlockTraits::stone(2.0);
        traits[BLOCK_LADDER as usize] = BlockTraits::climbable();
        traits[BLOCK_VINE as usize] = BlockTraits::climbable();
        traits[BLOCK_OAK_DOOR as usize] = BlockTraits::door(DoorKind::Wood);
        traits[BLOCK_IRON_DOOR as usize] = BlockTraits::door(DoorKind::Iron);
        traits[BLOCK_FENCE_GATE as usize] = BlockTraits::door(DoorKind::Gate);
        traits[BLOCK_TRAPDOOR as usize] = BlockTraits::door(DoorKind::Trapdoor);
        traits[BLOCK_TALL_GRASS as usize] = BlockTraits::soft();
        traits[BLOCK_OBSIDIAN as usize] = BlockTraits::stone(50.0);

        Self { traits }
    }

    /// Traits for a block ID; unknown IDs behave like stone.
    pub fn get(&self, id: BlockId) -> &BlockTraits {
        self.traits
            .get(id as usize)
            .unwrap_or(&self.traits[BLOCK_STONE as usize])
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
