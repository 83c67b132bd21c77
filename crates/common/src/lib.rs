//! Shared value types for the tilescape grid engine.
//!
//! # Invariants
//! - Facings and turn directions are closed enums; raw integers only enter
//!   through checked conversions.
//! - Face slot order is fixed and shared by every render backend.

mod facing;
mod types;

pub use facing::{Facing, InvalidFacing, StepKind, TurnDirection};
pub use types::{BatchId, CellPos, Face, SpaceId, SurfaceRef};

pub fn crate_info() -> &'static str {
    "tilescape-common v0.1.0"
}
