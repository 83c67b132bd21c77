//! Tilescape kernel: map bank, space registry, camera movement and the view pass.
//!
//! # Invariants
//! - Every grid access is bounds-checked; out-of-range reads return `None`.
//! - A rejected operation leaves maps, bindings and the camera untouched.
//! - The camera is never walking and turning at the same time.
//! - Batches are rebuilt only by `Engine::generate`; drawing uses what the
//!   last generate compiled.

mod bank;
mod config;
mod engine;
mod error;
mod grid;
mod movement;
mod space;
mod view;

pub use bank::{MapBank, MapId, MapSlot};
pub use config::{ConfigError, EngineConfig};
pub use engine::Engine;
pub use error::EngineError;
pub use grid::GridMap;
pub use movement::{Motion, MotionEvent, MovementController};
pub use space::{Space, SpaceRegistry, SurfaceSlot};
pub use view::{DrawStats, render_view};

pub fn crate_info() -> &'static str {
    "tilescape-kernel v0.1.0"
}
