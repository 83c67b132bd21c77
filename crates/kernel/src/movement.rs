use tilescape_common::{CellPos, Facing, StepKind, TurnDirection};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::grid::GridMap;

/// What the camera is animating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Idle,
    /// `offset` is signed along the walked axis and grows toward one square.
    Walking { direction: Facing, offset: f32 },
    /// `offset` is the live yaw in degrees; `flipped` is set once the facing
    /// has moved on at the 45 degree crossing.
    Turning {
        direction: TurnDirection,
        offset: f32,
        degrees_turned: f32,
        flipped: bool,
    },
}

/// A transition completed by [`MovementController::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    Arrived(CellPos),
    TurnFinished(Facing),
}

/// Discrete camera pose plus the walk/turn animation in progress.
#[derive(Debug, Clone)]
pub struct MovementController {
    position: CellPos,
    facing: Facing,
    motion: Motion,
    square_size: f32,
    seconds_per_square: f32,
    turn_speed: f32,
}

impl MovementController {
    pub fn new(config: &EngineConfig) -> Self {
        let seconds_per_square = if config.seconds_per_square > 0.0 {
            config.seconds_per_square
        } else {
            EngineConfig::DEFAULT_SECONDS_PER_SQUARE
        };
        let turn_speed = if config.turn_speed > 0.0 {
            config.turn_speed
        } else {
            EngineConfig::DEFAULT_TURN_SPEED
        };
        Self {
            position: CellPos::default(),
            facing: Facing::North,
            motion: Motion::Idle,
            square_size: config.square_size,
            seconds_per_square,
            turn_speed,
        }
    }

    pub fn position(&self) -> CellPos {
        self.position
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn is_idle(&self) -> bool {
        self.motion == Motion::Idle
    }

    pub fn is_walking(&self) -> bool {
        matches!(self.motion, Motion::Walking { .. })
    }

    pub fn is_turning(&self) -> bool {
        matches!(self.motion, Motion::Turning { .. })
    }

    pub fn walk_direction(&self) -> Option<Facing> {
        match self.motion {
            Motion::Walking { direction, .. } => Some(direction),
            _ => None,
        }
    }

    pub fn turn_direction(&self) -> Option<TurnDirection> {
        match self.motion {
            Motion::Turning { direction, .. } => Some(direction),
            _ => None,
        }
    }

    /// Signed walk offset in world units, `0` unless walking.
    pub fn walk_offset(&self) -> f32 {
        match self.motion {
            Motion::Walking { offset, .. } => offset,
            _ => 0.0,
        }
    }

    /// Live turn offset in degrees, `0` unless turning.
    pub fn turn_offset(&self) -> f32 {
        match self.motion {
            Motion::Turning { offset, .. } => offset,
            _ => 0.0,
        }
    }

    pub fn seconds_per_square(&self) -> f32 {
        self.seconds_per_square
    }

    /// Walking pace in world units per second.
    pub fn walk_speed(&self) -> f32 {
        self.square_size / self.seconds_per_square
    }

    /// Degrees per `advance` call.
    pub fn turn_speed(&self) -> f32 {
        self.turn_speed
    }

    /// `0` restores the default pace.
    pub fn set_walking_speed(&mut self, seconds_per_square: f32) -> Result<(), EngineError> {
        if !seconds_per_square.is_finite() || seconds_per_square < 0.0 {
            return Err(EngineError::InvalidWalkSpeed(seconds_per_square));
        }
        self.seconds_per_square = if seconds_per_square == 0.0 {
            EngineConfig::DEFAULT_SECONDS_PER_SQUARE
        } else {
            seconds_per_square
        };
        Ok(())
    }

    /// `0` restores the default; anything outside `0..=90` is rejected.
    pub fn set_turning_speed(&mut self, degrees: f32) -> Result<(), EngineError> {
        if !(0.0..=EngineConfig::MAX_TURN_SPEED).contains(&degrees) {
            return Err(EngineError::InvalidTurnSpeed(degrees));
        }
        self.turn_speed = if degrees == 0.0 {
            EngineConfig::DEFAULT_TURN_SPEED
        } else {
            degrees
        };
        Ok(())
    }

    /// Teleport. Any animation in progress is dropped.
    pub fn place(&mut self, position: CellPos, facing: Option<Facing>) {
        self.position = position;
        if let Some(facing) = facing {
            self.facing = facing;
        }
        self.motion = Motion::Idle;
    }

    /// Begin walking one cell. The target must lie inside `grid` and, unless
    /// `force` is set, be walkable.
    pub fn step(&mut self, kind: StepKind, force: bool, grid: &GridMap) -> Result<(), EngineError> {
        if !self.is_idle() {
            return Err(EngineError::Busy);
        }
        let direction = kind.resolve(self.facing);
        let target = self.position.step(direction);
        if !grid.contains_pos(target) {
            return Err(EngineError::OutOfBounds {
                x: target.x,
                y: target.y,
            });
        }
        if !force && !grid.is_walkable(target.x, target.y) {
            return Err(EngineError::Blocked {
                x: target.x,
                y: target.y,
            });
        }
        self.motion = Motion::Walking {
            direction,
            offset: 0.0,
        };
        Ok(())
    }

    /// Begin a quarter turn.
    pub fn turn(&mut self, direction: TurnDirection) -> Result<(), EngineError> {
        if !self.is_idle() {
            return Err(EngineError::Busy);
        }
        self.motion = Motion::Turning {
            direction,
            offset: 0.0,
            degrees_turned: 0.0,
            flipped: false,
        };
        Ok(())
    }

    /// Apply one frame of animation. Walking moves by `walk_speed * delta`;
    /// turning moves by one `turn_speed` increment regardless of `delta`.
    pub fn advance(&mut self, delta: f32) -> Option<MotionEvent> {
        match self.motion {
            Motion::Idle => None,
            Motion::Walking { direction, offset } => {
                let offset = offset + direction.sign() * self.walk_speed() * delta;
                if offset.abs() >= self.square_size {
                    self.position = self.position.step(direction);
                    self.motion = Motion::Idle;
                    tracing::trace!(position = ?self.position, "walk finished");
                    return Some(MotionEvent::Arrived(self.position));
                }
                self.motion = Motion::Walking { direction, offset };
                None
            }
            Motion::Turning {
                direction,
                offset,
                degrees_turned,
                mut flipped,
            } => {
                let mut offset = offset + direction.sign() * self.turn_speed;
                let degrees_turned = degrees_turned + self.turn_speed;
                if !flipped && offset.abs() > 45.0 {
                    self.facing = direction.apply(self.facing);
                    offset -= direction.sign() * 90.0;
                    flipped = true;
                    tracing::trace!(facing = %self.facing, "facing flipped");
                }
                if degrees_turned >= 90.0 {
                    // clamp whatever remainder the last increment left behind
                    self.motion = Motion::Idle;
                    tracing::trace!(facing = %self.facing, "turn finished");
                    return Some(MotionEvent::TurnFinished(self.facing));
                }
                self.motion = Motion::Turning {
                    direction,
                    offset,
                    degrees_turned,
                    flipped,
                };
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilescape_common::SpaceId;

    const DELTA: f32 = 0.0625;

    fn config() -> EngineConfig {
        EngineConfig {
            square_size: 1.0,
            seconds_per_square: 0.25,
            ..EngineConfig::default()
        }
    }

    /// 3x3, open except a wall at the centre.
    fn grid() -> GridMap {
        let mut g = GridMap::new(3, 3).unwrap();
        g.set_space(1, 1, SpaceId(9)).unwrap();
        g
    }

    fn controller_at(x: i32, y: i32, facing: Facing) -> MovementController {
        let mut c = MovementController::new(&config());
        c.place(CellPos::new(x, y), Some(facing));
        c
    }

    #[test]
    fn blocked_step_needs_force() {
        let g = grid();
        let mut c = controller_at(0, 1, Facing::East);
        assert_eq!(
            c.step(StepKind::Forward, false, &g),
            Err(EngineError::Blocked { x: 1, y: 1 })
        );
        assert!(c.is_idle());
        assert_eq!(c.position(), CellPos::new(0, 1));

        c.step(StepKind::Forward, true, &g).unwrap();
        assert_eq!(c.walk_direction(), Some(Facing::East));
    }

    #[test]
    fn bounds_hold_even_when_forced() {
        let g = grid();
        let mut c = controller_at(0, 1, Facing::West);
        assert_eq!(
            c.step(StepKind::Forward, true, &g),
            Err(EngineError::OutOfBounds { x: -1, y: 1 })
        );
        assert_eq!(c.motion(), Motion::Idle);
    }

    #[test]
    fn relative_steps_resolve_against_facing() {
        let g = GridMap::new(3, 3).unwrap();
        let cases = [
            (StepKind::Forward, Facing::East),
            (StepKind::Backward, Facing::West),
            (StepKind::Left, Facing::North),
            (StepKind::Right, Facing::South),
        ];
        for (kind, expected) in cases {
            let mut c = controller_at(1, 1, Facing::East);
            c.step(kind, false, &g).unwrap();
            assert_eq!(c.walk_direction(), Some(expected), "{kind:?}");
        }
    }

    #[test]
    fn walking_reaches_the_next_cell() {
        let g = GridMap::new(3, 3).unwrap();
        let mut c = controller_at(1, 1, Facing::South);
        c.step(StepKind::Forward, false, &g).unwrap();

        let mut last = 0.0;
        for _ in 0..3 {
            assert_eq!(c.advance(DELTA), None);
            let offset = c.walk_offset();
            assert!(offset < 0.0);
            assert!(offset.abs() > last);
            last = offset.abs();
        }
        assert_eq!(c.advance(DELTA), Some(MotionEvent::Arrived(CellPos::new(1, 0))));
        assert!(c.is_idle());
        assert_eq!(c.walk_offset(), 0.0);
        assert_eq!(c.facing(), Facing::South);
    }

    #[test]
    fn commands_rejected_while_animating() {
        let g = GridMap::new(3, 3).unwrap();
        let mut c = controller_at(1, 1, Facing::North);
        c.step(StepKind::Forward, false, &g).unwrap();
        c.advance(DELTA);
        let before = c.motion();
        assert_eq!(c.turn(TurnDirection::Left), Err(EngineError::Busy));
        assert_eq!(c.step(StepKind::Forward, false, &g), Err(EngineError::Busy));
        assert_eq!(c.motion(), before);

        let mut c = controller_at(1, 1, Facing::North);
        c.turn(TurnDirection::Right).unwrap();
        assert_eq!(c.step(StepKind::Forward, false, &g), Err(EngineError::Busy));
        assert_eq!(c.turn(TurnDirection::Left), Err(EngineError::Busy));
    }

    fn run_turn(c: &mut MovementController) -> (usize, usize) {
        let start = c.facing();
        let mut flips = 0;
        let mut last = start;
        for frame in 1..=200 {
            let event = c.advance(DELTA);
            if c.facing() != last {
                flips += 1;
                last = c.facing();
            }
            if let Some(MotionEvent::TurnFinished(_)) = event {
                return (frame, flips);
            }
        }
        panic!("turn never finished");
    }

    #[test]
    fn default_turn_flips_once_at_45() {
        let mut c = controller_at(0, 0, Facing::North);
        c.turn(TurnDirection::Right).unwrap();
        for _ in 0..9 {
            c.advance(DELTA);
        }
        // 45 is not past the crossing
        assert_eq!(c.facing(), Facing::North);
        assert_eq!(c.turn_offset(), 45.0);
        c.advance(DELTA);
        assert_eq!(c.facing(), Facing::East);
        assert_eq!(c.turn_offset(), -40.0);

        let mut c = controller_at(0, 0, Facing::North);
        c.turn(TurnDirection::Right).unwrap();
        assert_eq!(run_turn(&mut c), (18, 1));
        assert!(c.is_idle());
        assert_eq!(c.turn_offset(), 0.0);
        assert_eq!(c.facing(), Facing::East);
    }

    #[test]
    fn uneven_speed_clamps_overshoot() {
        let mut c = controller_at(0, 0, Facing::North);
        c.set_turning_speed(7.0).unwrap();
        c.turn(TurnDirection::Left).unwrap();
        // 13 * 7 = 91 >= 90
        assert_eq!(run_turn(&mut c), (13, 1));
        assert_eq!(c.facing(), Facing::West);
        assert_eq!(c.turn_offset(), 0.0);
    }

    #[test]
    fn large_turn_speeds() {
        for (speed, frames) in [(45.0, 2), (90.0, 1)] {
            let mut c = controller_at(0, 0, Facing::West);
            c.set_turning_speed(speed).unwrap();
            c.turn(TurnDirection::Right).unwrap();
            assert_eq!(run_turn(&mut c), (frames, 1), "speed {speed}");
            assert_eq!(c.facing(), Facing::North);
        }
    }

    #[test]
    fn four_turns_cycle_back() {
        let mut c = controller_at(0, 0, Facing::South);
        for _ in 0..4 {
            c.turn(TurnDirection::Left).unwrap();
            run_turn(&mut c);
        }
        assert_eq!(c.facing(), Facing::South);
    }

    #[test]
    fn speed_validation() {
        let mut c = controller_at(0, 0, Facing::North);
        assert_eq!(c.set_turning_speed(-1.0), Err(EngineError::InvalidTurnSpeed(-1.0)));
        assert!(c.set_turning_speed(90.5).is_err());
        assert!(c.set_turning_speed(f32::NAN).is_err());
        c.set_turning_speed(30.0).unwrap();
        c.set_turning_speed(0.0).unwrap();
        assert_eq!(c.turn_speed(), EngineConfig::DEFAULT_TURN_SPEED);

        assert!(c.set_walking_speed(-0.5).is_err());
        assert!(c.set_walking_speed(f32::INFINITY).is_err());
        c.set_walking_speed(0.5).unwrap();
        assert_eq!(c.walk_speed(), 2.0);
        c.set_walking_speed(0.0).unwrap();
        assert_eq!(c.seconds_per_square(), EngineConfig::DEFAULT_SECONDS_PER_SQUARE);
    }

    #[test]
    fn place_cancels_animation() {
        let g = GridMap::new(3, 3).unwrap();
        let mut c = controller_at(1, 1, Facing::North);
        c.step(StepKind::Forward, false, &g).unwrap();
        c.advance(DELTA);
        c.place(CellPos::new(2, 2), None);
        assert!(c.is_idle());
        assert_eq!(c.walk_offset(), 0.0);
        assert_eq!(c.facing(), Facing::North);
        assert_eq!(c.advance(DELTA), None);
    }
}
