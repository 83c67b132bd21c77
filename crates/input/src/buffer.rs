use std::collections::VecDeque;
use tilescape_kernel::{Engine, EngineError};
use tilescape_render::RenderBackend;

use crate::action::Action;

/// Result of one [`ActionBuffer::pump`].
#[derive(Debug, Clone, PartialEq)]
pub enum Pumped {
    /// Nothing was queued.
    Empty,
    Applied(Action),
    /// The camera was busy; the action stays at the front of the queue.
    Deferred(Action),
    /// The engine refused the action for good; it has been discarded.
    Dropped(Action, EngineError),
}

/// FIFO of pending commands, applied one per frame.
#[derive(Debug, Clone, Default)]
pub struct ActionBuffer {
    queue: VecDeque<Action>,
}

impl ActionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.queue.push_back(action);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn peek(&self) -> Option<&Action> {
        self.queue.front()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Try the oldest action against `engine`.
    pub fn pump<B: RenderBackend + 'static>(&mut self, engine: &mut Engine<B>) -> Pumped {
        let Some(&action) = self.queue.front() else {
            return Pumped::Empty;
        };
        match action.apply(engine) {
            Ok(()) => {
                self.queue.pop_front();
                Pumped::Applied(action)
            }
            Err(EngineError::Busy) => Pumped::Deferred(action),
            Err(err) => {
                self.queue.pop_front();
                tracing::debug!(?action, error = %err, "queued action dropped");
                Pumped::Dropped(action, err)
            }
        }
    }
}

impl Extend<Action> for ActionBuffer {
    fn extend<I: IntoIterator<Item = Action>>(&mut self, iter: I) {
        self.queue.extend(iter);
    }
}

impl FromIterator<Action> for ActionBuffer {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use tilescape_common::{CellPos, Facing, StepKind, TurnDirection};
    use tilescape_render::RecordingBackend;

    fn engine() -> Engine<RecordingBackend> {
        let mut engine = Engine::with_defaults(Rc::new(RecordingBackend::new()));
        // 3x1 corridor running east, wall at the far end
        let id = engine.add_map(&[0, 0, 5], 3, 1).unwrap();
        engine.set_current_map(id).unwrap();
        engine.set_player_position(0, 0, Some(Facing::East)).unwrap();
        engine
    }

    #[test]
    fn empty_buffer_reports_empty() {
        let mut e = engine();
        assert_eq!(ActionBuffer::new().pump(&mut e), Pumped::Empty);
    }

    #[test]
    fn busy_rejection_keeps_the_action() {
        let mut e = engine();
        let mut buf: ActionBuffer = [
            Action::step(StepKind::Forward),
            Action::Turn(TurnDirection::Left),
        ]
        .into_iter()
        .collect();

        assert_eq!(buf.pump(&mut e), Pumped::Applied(Action::step(StepKind::Forward)));
        assert_eq!(buf.pump(&mut e), Pumped::Deferred(Action::Turn(TurnDirection::Left)));
        assert_eq!(buf.len(), 1);

        while e.is_walking() {
            e.advance().unwrap();
        }
        assert_eq!(e.player_position(), Some(CellPos::new(1, 0)));
        assert_eq!(buf.pump(&mut e), Pumped::Applied(Action::Turn(TurnDirection::Left)));
        assert!(buf.is_empty());
    }

    #[test]
    fn other_rejections_drop_the_action() {
        let mut e = engine();
        e.set_player_position(1, 0, None).unwrap();
        let mut buf = ActionBuffer::new();
        buf.extend([Action::step(StepKind::Forward), Action::step(StepKind::Left)]);

        assert_eq!(
            buf.pump(&mut e),
            Pumped::Dropped(Action::step(StepKind::Forward), EngineError::Blocked { x: 2, y: 0 })
        );
        assert_eq!(
            buf.pump(&mut e),
            Pumped::Dropped(Action::step(StepKind::Left), EngineError::OutOfBounds { x: 1, y: 1 })
        );
        assert!(buf.is_empty());
        assert_eq!(e.player_position(), Some(CellPos::new(1, 0)));
    }
}
