//! Directional commands for the tilescape engine.
//!
//! # Invariants
//! - Hosts drive the camera only through `Action`s, never raw device events.
//! - A command rejected because the camera is busy is retried, not lost.

pub mod action;
mod buffer;

pub use action::{Action, UnknownAction};
pub use buffer::{ActionBuffer, Pumped};

pub fn crate_info() -> &'static str {
    "tilescape-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
