//! Developer tooling: engine inspector and text dumps of the current map.
//!
//! # Invariants
//! - Tools only read engine state.

pub mod inspector;

pub use inspector::{EngineInspector, EngineSummary, SpaceInfo};

pub fn crate_info() -> &'static str {
    "tilescape-tools v0.1.0"
}
