use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// An integer block coordinate in the world grid.
///
/// Equality, ordering and hashing are all derived so positions can be
/// used as set/map keys with deterministic iteration when stored in
/// ordered containers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct BlockPos {
    /// World X coordinate.
    pub x: i32,
    /// World Y coordinate (vertical).
    pub y: i32,
    /// World Z coordinate.
    pub z: i32,
}

/// The four cardinal horizontal offsets as `(dx, dz)` pairs.
///
/// The order is fixed so that neighbor expansion is deterministic.
pub const CARDINALS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// The four diagonal horizontal offsets as `(dx, dz)` pairs.
pub const DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

impl BlockPos {
    /// Create a position from world coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The position offset by the given deltas.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The block directly above.
    pub const fn up(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// The block directly below.
    pub const fn down(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// Squared euclidean distance to `other`, in blocks.
    pub fn distance_sq(self, other: Self) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        let dz = (self.z - other.z) as f64;
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean distance to `other`, in blocks.
    pub fn distance(self, other: Self) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Squared horizontal (XZ) distance to `other`.
    pub fn distance_sq_xz(self, other: Self) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dz = (self.z - other.z) as f64;
        dx * dx + dz * dz
    }

    /// Center of the block as floating-point world coordinates.
    pub fn center(self) -> [f64; 3] {
        [
            self.x as f64 + 0.5,
            self.y as f64,
            self.z as f64 + 0.5,
        ]
    }

    /// Whether `point` (world coordinates) lies within this block's
    /// column footprint, ignoring Y.
    pub fn contains_xz(self, point: [f64; 3]) -> bool {
        point[0] >= self.x as f64
            && point[0] < self.x as f64 + 1.0
            && point[2] >= self.z as f64
            && point[2] < self.z as f64 + 1.0
    }
}

impl Add for BlockPos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for BlockPos {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
