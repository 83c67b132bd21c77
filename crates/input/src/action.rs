use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tilescape_common::{StepKind, TurnDirection};
use tilescape_kernel::{Engine, EngineError};
use tilescape_render::RenderBackend;

/// A directional command, independent of the device that produced it.
///
/// Hosts map keys or buttons to actions; the engine only ever sees actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// One cell relative to the facing. `force` ignores walkability.
    Step { kind: StepKind, force: bool },
    /// A quarter turn.
    Turn(TurnDirection),
    /// Unbound input.
    Noop,
}

/// Text that does not name an [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action {0:?}; expected f, b, l, r (optionally with !), tl, tr or wait")]
pub struct UnknownAction(pub String);

impl Action {
    pub const fn step(kind: StepKind) -> Self {
        Self::Step { kind, force: false }
    }

    pub const fn forced(kind: StepKind) -> Self {
        Self::Step { kind, force: true }
    }

    /// Issue this command to `engine`.
    pub fn apply<B: RenderBackend + 'static>(self, engine: &mut Engine<B>) -> Result<(), EngineError> {
        match self {
            Self::Step { kind, force } => engine.step_toward(kind, force),
            Self::Turn(TurnDirection::Left) => engine.turn_left(),
            Self::Turn(TurnDirection::Right) => engine.turn_right(),
            Self::Noop => Ok(()),
        }
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    /// Short move codes: `f`, `b`, `l`, `r` step (a trailing `!` forces the
    /// step), `tl`/`tr` turn, `wait` does nothing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        let (name, force) = match token.strip_suffix('!') {
            Some(name) => (name, true),
            None => (token.as_str(), false),
        };
        let step = |kind| Self::Step { kind, force };
        let action = match name {
            "f" | "forward" => step(StepKind::Forward),
            "b" | "back" | "backward" => step(StepKind::Backward),
            "l" | "left" => step(StepKind::Left),
            "r" | "right" => step(StepKind::Right),
            "tl" | "turn-left" if !force => Self::Turn(TurnDirection::Left),
            "tr" | "turn-right" if !force => Self::Turn(TurnDirection::Right),
            "wait" | "noop" if !force => Self::Noop,
            _ => return Err(UnknownAction(s.to_string())),
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use tilescape_common::{CellPos, Facing};
    use tilescape_render::RecordingBackend;

    #[test]
    fn parses_move_codes() {
        assert_eq!("f".parse::<Action>(), Ok(Action::step(StepKind::Forward)));
        assert_eq!(" R! ".parse::<Action>(), Ok(Action::forced(StepKind::Right)));
        assert_eq!("backward".parse::<Action>(), Ok(Action::step(StepKind::Backward)));
        assert_eq!("tl".parse::<Action>(), Ok(Action::Turn(TurnDirection::Left)));
        assert_eq!("wait".parse::<Action>(), Ok(Action::Noop));
        assert!("tl!".parse::<Action>().is_err());
        assert_eq!("jump".parse::<Action>(), Err(UnknownAction("jump".into())));
    }

    #[test]
    fn apply_drives_the_engine() {
        let mut engine = Engine::with_defaults(Rc::new(RecordingBackend::new()));
        let id = engine.add_map(&[0, 0, 0, 1], 2, 2).unwrap();
        engine.set_current_map(id).unwrap();
        engine.set_player_position(0, 0, Some(Facing::North)).unwrap();

        assert_eq!(
            Action::step(StepKind::Right).apply(&mut engine),
            Ok(())
        );
        assert_eq!(engine.walk_direction(), Some(Facing::East));
        assert_eq!(Action::Noop.apply(&mut engine), Ok(()));
        assert_eq!(
            Action::Turn(TurnDirection::Left).apply(&mut engine),
            Err(EngineError::Busy)
        );
        assert_eq!(engine.player_position(), Some(CellPos::new(0, 0)));
    }
}
