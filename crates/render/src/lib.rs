//! Rendering seam: backend traits, scoped face batches, geometry, visibility.
//!
//! # Invariants
//! - Renderers never mutate grid or camera state.
//! - Every allocated batch is released exactly once, by `Batch`'s drop.
//! - Wall culling and the visited window come from one per-facing table.
//!
//! `RecordingBackend` is an in-memory implementation of the backend traits.
//! The traits are stable; a GPU backend plugs in without touching consumers.

mod geometry;
mod recording;
mod renderer;
pub mod visibility;

pub use geometry::{Quad, SpaceGeometry};
pub use recording::{BackendCall, DrawnFace, RecordingBackend};
pub use renderer::{Batch, BatchFactory, RenderBackend};
pub use visibility::{FacingView, ViewWindow};

pub fn crate_info() -> &'static str {
    "tilescape-render v0.1.0"
}
