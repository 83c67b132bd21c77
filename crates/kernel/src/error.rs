use tilescape_common::InvalidFacing;

use crate::bank::MapId;

/// Why an engine operation was rejected.
///
/// A rejected operation never leaves partial state behind; the host may
/// simply retry it later.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("no map is current")]
    NoCurrentMap,
    #[error("cell ({x}, {y}) is outside the map")]
    OutOfBounds { x: i32, y: i32 },
    #[error("cell ({x}, {y}) is not walkable")]
    Blocked { x: i32, y: i32 },
    #[error("camera is already walking or turning")]
    Busy,
    #[error("all {0} map slots are occupied")]
    MapBankFull(usize),
    #[error("{0} does not exist")]
    UnknownMap(MapId),
    #[error("invalid map dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("grid has {actual} cells, expected {expected}")]
    GridSizeMismatch { expected: usize, actual: usize },
    #[error("invalid walking speed {0}; expected seconds per square >= 0")]
    InvalidWalkSpeed(f32),
    #[error("invalid turning speed {0}; expected degrees in 0..=90")]
    InvalidTurnSpeed(f32),
    #[error("invalid frame delta {0}; expected seconds >= 0")]
    InvalidDeltaTime(f32),
    #[error(transparent)]
    InvalidFacing(#[from] InvalidFacing),
}
