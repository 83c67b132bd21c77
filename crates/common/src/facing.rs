use serde::{Deserialize, Serialize};

/// One of the four cardinal directions a camera can face.
///
/// North points up the map's Y axis, East up the X axis. The discriminants
/// are the wire values hosts use (`0..=3`, clockwise from North).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Facing {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

/// A raw facing value outside `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid facing value {0}; expected 0..=3")]
pub struct InvalidFacing(pub i32);

impl Facing {
    /// All facings in clockwise order starting at North.
    pub const ALL: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    pub fn index(self) -> i32 {
        self as i32
    }

    /// Quarter-turn counter-clockwise.
    pub fn rotate_left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::East => Self::North,
            Self::South => Self::East,
            Self::West => Self::South,
        }
    }

    /// Quarter-turn clockwise.
    pub fn rotate_right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    pub fn opposite(self) -> Self {
        self.rotate_left().rotate_left()
    }

    /// Grid delta of one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// True for East/West (motion along the grid's X axis).
    pub fn is_x_axis(self) -> bool {
        matches!(self, Self::East | Self::West)
    }

    /// +1 when moving up the axis (North/East), -1 otherwise.
    pub fn sign(self) -> f32 {
        match self {
            Self::North | Self::East => 1.0,
            Self::South | Self::West => -1.0,
        }
    }

    /// Yaw applied to the model matrix for this facing, in degrees.
    pub fn yaw_degrees(self) -> f32 {
        self.index() as f32 * 90.0
    }
}

impl TryFrom<i32> for Facing {
    type Error = InvalidFacing;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::North),
            1 => Ok(Self::East),
            2 => Ok(Self::South),
            3 => Ok(Self::West),
            other => Err(InvalidFacing(other)),
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

/// Direction of an in-progress quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    /// Sign of the turn offset: left turns run negative.
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    pub fn apply(self, facing: Facing) -> Facing {
        match self {
            Self::Left => facing.rotate_left(),
            Self::Right => facing.rotate_right(),
        }
    }
}

/// A one-cell movement command, relative to the camera's facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Forward,
    Backward,
    Left,
    Right,
}

impl StepKind {
    /// Compass direction of this step for a camera facing `facing`.
    pub fn resolve(self, facing: Facing) -> Facing {
        match self {
            Self::Forward => facing,
            Self::Backward => facing.opposite(),
            Self::Left => facing.rotate_left(),
            Self::Right => facing.rotate_right(),
        }
    }
}
