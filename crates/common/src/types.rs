use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::facing::Facing;

/// Identifier of a kind of map cell. `0` is the empty, walkable default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpaceId(pub i32);

impl SpaceId {
    pub const EMPTY: SpaceId = SpaceId(0);

    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl From<i32> for SpaceId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Opaque reference to a host-owned surface (texture). The engine never
/// creates or frees the underlying resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceRef(pub u32);

/// Handle to a block of compiled face slots owned by a render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BatchId(pub u32);

/// Integer cell coordinate. (0,0) is the bottom-left (south-west) corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in `facing`.
    pub fn step(self, facing: Facing) -> Self {
        let (dx, dy) = facing.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// One drawable face of a cell. Walls are named by their position relative to
/// a viewer looking north, so each also corresponds to a compass side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    /// North side.
    WallFar,
    /// East side.
    WallRight,
    /// South side.
    WallNear,
    /// West side.
    WallLeft,
    Floor,
    Ceiling,
}

impl Face {
    pub const COUNT: usize = 6;

    /// Faces in slot order.
    pub const ALL: [Face; Face::COUNT] = [
        Face::WallFar,
        Face::WallRight,
        Face::WallNear,
        Face::WallLeft,
        Face::Floor,
        Face::Ceiling,
    ];

    pub const WALLS: [Face; 4] = [Face::WallFar, Face::WallRight, Face::WallNear, Face::WallLeft];

    /// Slot index inside a batch.
    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn is_wall(self) -> bool {
        !matches!(self, Self::Floor | Self::Ceiling)
    }

    /// The wall on the given compass side of a cell.
    pub fn wall(side: Facing) -> Face {
        match side {
            Facing::North => Self::WallFar,
            Facing::East => Self::WallRight,
            Facing::South => Self::WallNear,
            Facing::West => Self::WallLeft,
        }
    }

    /// Outward normal in render space (grid north is -Z).
    pub fn normal(self) -> Vec3 {
        match self {
            Self::WallFar => Vec3::NEG_Z,
            Self::WallRight => Vec3::X,
            Self::WallNear => Vec3::Z,
            Self::WallLeft => Vec3::NEG_X,
            Self::Floor => Vec3::Y,
            Self::Ceiling => Vec3::NEG_Y,
        }
    }
}
