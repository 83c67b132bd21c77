use std::rc::Rc;
use tilescape_common::{CellPos, Facing, SpaceId, StepKind, SurfaceRef, TurnDirection};
use tilescape_render::{BatchFactory, RenderBackend, SpaceGeometry};

use crate::bank::{MapBank, MapId, MapSlot};
use crate::config::{ConfigError, EngineConfig};
use crate::error::EngineError;
use crate::grid::GridMap;
use crate::movement::{Motion, MotionEvent, MovementController};
use crate::space::{Space, SurfaceSlot};
use crate::view::{DrawStats, render_view};

/// The tile-grid engine: a bank of maps, the camera, and the draw pass.
///
/// Every mutating call either succeeds completely or returns an
/// [`EngineError`] with no state changed. Map-scoped calls act on the current
/// map and fail with [`EngineError::NoCurrentMap`] when none is selected.
pub struct Engine<B: RenderBackend + 'static> {
    backend: Rc<B>,
    config: EngineConfig,
    geometry: SpaceGeometry,
    bank: MapBank,
    camera: MovementController,
    delta: f32,
}

impl<B: RenderBackend + 'static> Engine<B> {
    pub fn new(backend: Rc<B>, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(?config, "engine created");
        Ok(Self {
            geometry: config.geometry(),
            bank: MapBank::with_capacity(config.max_maps),
            camera: MovementController::new(&config),
            delta: config.frame_delta,
            backend,
            config,
        })
    }

    pub fn with_defaults(backend: Rc<B>) -> Self {
        let config = EngineConfig::default();
        Self {
            geometry: config.geometry(),
            bank: MapBank::with_capacity(config.max_maps),
            camera: MovementController::new(&config),
            delta: config.frame_delta,
            backend,
            config,
        }
    }

    pub fn backend(&self) -> &Rc<B> {
        &self.backend
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bank(&self) -> &MapBank {
        &self.bank
    }

    pub fn camera(&self) -> &MovementController {
        &self.camera
    }

    // --- map bank ---

    /// Load a map from a flat slice indexed `x * height + y`. The new map is
    /// not made current.
    pub fn add_map(&mut self, cells: &[i32], width: i32, height: i32) -> Result<MapId, EngineError> {
        let grid = GridMap::from_cells(cells, width, height)?;
        self.add_grid(grid)
    }

    /// Load a map from columns indexed `[x][y]`.
    pub fn add_map_columns(&mut self, columns: &[Vec<i32>]) -> Result<MapId, EngineError> {
        let grid = GridMap::from_columns(columns)?;
        self.add_grid(grid)
    }

    pub fn add_grid(&mut self, grid: GridMap) -> Result<MapId, EngineError> {
        let (width, height) = (grid.width(), grid.height());
        let factory: Rc<dyn BatchFactory> = self.backend.clone();
        let id = logged("add_map", self.bank.add(MapSlot::new(grid, factory)))?;
        tracing::debug!(%id, width, height, "map added");
        Ok(id)
    }

    /// Drop a map together with its batches.
    pub fn delete_map(&mut self, id: MapId) -> Result<(), EngineError> {
        logged("delete_map", self.bank.delete(id))?;
        tracing::debug!(%id, "map deleted");
        Ok(())
    }

    pub fn is_map(&self, id: MapId) -> bool {
        self.bank.is_map(id)
    }

    pub fn set_current_map(&mut self, id: MapId) -> Result<(), EngineError> {
        logged("set_current_map", self.bank.set_current(id))?;
        tracing::debug!(%id, "map selected");
        Ok(())
    }

    pub fn current_map(&self) -> Option<MapId> {
        self.bank.current_id()
    }

    fn map(&self) -> Result<&MapSlot, EngineError> {
        self.bank.current().ok_or(EngineError::NoCurrentMap)
    }

    fn map_mut(&mut self) -> Result<&mut MapSlot, EngineError> {
        self.bank.current_mut().ok_or(EngineError::NoCurrentMap)
    }

    // --- cells ---

    /// Set a cell's space id; walkability resets to `space == 0`.
    pub fn change_square(&mut self, x: i32, y: i32, space: impl Into<SpaceId>) -> Result<(), EngineError> {
        let space = space.into();
        let map = self.map_mut()?;
        map.grid.set_space(x, y, space)?;
        map.spaces.ensure(space);
        Ok(())
    }

    pub fn make_walkable(&mut self, x: i32, y: i32) -> Result<(), EngineError> {
        self.map_mut()?.grid.set_walkable(x, y, true)
    }

    pub fn make_non_walkable(&mut self, x: i32, y: i32) -> Result<(), EngineError> {
        self.map_mut()?.grid.set_walkable(x, y, false)
    }

    pub fn space(&self, x: i32, y: i32) -> Option<SpaceId> {
        self.bank.current()?.grid.space(x, y)
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.bank
            .current()
            .is_some_and(|map| map.grid.is_walkable(x, y))
    }

    /// Space id under the camera.
    pub fn current_space(&self) -> Option<SpaceId> {
        let pos = self.camera.position();
        self.space(pos.x, pos.y)
    }

    /// `(width, height)` of the current map.
    pub fn map_size(&self) -> Option<(i32, i32)> {
        let grid = &self.bank.current()?.grid;
        Some((grid.width(), grid.height()))
    }

    pub fn space_entry(&self, id: SpaceId) -> Option<&Space> {
        self.bank.current()?.spaces.get(id)
    }

    // --- surfaces ---

    fn bind(&mut self, id: SpaceId, slot: SurfaceSlot, surface: Option<SurfaceRef>) -> Result<(), EngineError> {
        self.map_mut()?.spaces.bind(id, slot, surface);
        Ok(())
    }

    /// Bind (`Some`) or unbind (`None`) the wall surface of a space type.
    /// Takes effect at the next [`generate`](Self::generate).
    pub fn bind_wall(&mut self, id: impl Into<SpaceId>, surface: Option<SurfaceRef>) -> Result<(), EngineError> {
        self.bind(id.into(), SurfaceSlot::Wall, surface)
    }

    pub fn bind_floor(&mut self, id: impl Into<SpaceId>, surface: Option<SurfaceRef>) -> Result<(), EngineError> {
        self.bind(id.into(), SurfaceSlot::Floor, surface)
    }

    pub fn bind_ceiling(&mut self, id: impl Into<SpaceId>, surface: Option<SurfaceRef>) -> Result<(), EngineError> {
        self.bind(id.into(), SurfaceSlot::Ceiling, surface)
    }

    /// Floor of the empty space type.
    pub fn bind_master_floor(&mut self, surface: Option<SurfaceRef>) -> Result<(), EngineError> {
        self.bind(SpaceId::EMPTY, SurfaceSlot::Floor, surface)
    }

    /// Ceiling of the empty space type.
    pub fn bind_master_ceiling(&mut self, surface: Option<SurfaceRef>) -> Result<(), EngineError> {
        self.bind(SpaceId::EMPTY, SurfaceSlot::Ceiling, surface)
    }

    // --- batches and drawing ---

    /// Rebuild the batches of the current map from the present bindings.
    /// Returns how many were built.
    pub fn generate(&mut self) -> Result<usize, EngineError> {
        let geometry = self.geometry;
        let id = self.bank.current_id();
        let built = self.map_mut()?.spaces.generate(&geometry);
        tracing::debug!(map = ?id, built, "batches generated");
        Ok(built)
    }

    /// Render the current map from the camera, then optionally apply one
    /// frame of camera animation using the stored delta.
    pub fn draw(&mut self, distance: u32, advance_player: bool) -> Result<DrawStats, EngineError> {
        let _span = tracing::trace_span!("draw", distance).entered();
        let map = self.map()?;
        let stats = render_view(
            &*self.backend,
            map,
            &self.camera,
            self.config.square_size,
            distance,
        );
        tracing::trace!(
            cells = stats.cells_visited,
            faces = stats.faces_drawn,
            "draw pass"
        );
        if advance_player {
            self.camera.advance(self.delta);
        }
        Ok(stats)
    }

    // --- camera ---

    /// Teleport the camera, cancelling any walk or turn. `None` keeps the
    /// current facing.
    pub fn set_player_position(&mut self, x: i32, y: i32, facing: Option<Facing>) -> Result<(), EngineError> {
        let map = self.map()?;
        if !map.grid.contains(x, y) {
            return logged("set_player_position", Err(EngineError::OutOfBounds { x, y }));
        }
        self.camera.place(CellPos::new(x, y), facing);
        Ok(())
    }

    fn step(&mut self, kind: StepKind, force: bool) -> Result<(), EngineError> {
        let map = self.bank.current().ok_or(EngineError::NoCurrentMap)?;
        logged("step", self.camera.step(kind, force, &map.grid))
    }

    pub fn step_forward(&mut self, force: bool) -> Result<(), EngineError> {
        self.step(StepKind::Forward, force)
    }

    pub fn step_backward(&mut self, force: bool) -> Result<(), EngineError> {
        self.step(StepKind::Backward, force)
    }

    pub fn step_left(&mut self, force: bool) -> Result<(), EngineError> {
        self.step(StepKind::Left, force)
    }

    pub fn step_right(&mut self, force: bool) -> Result<(), EngineError> {
        self.step(StepKind::Right, force)
    }

    /// Relative step by kind; see [`StepKind`].
    pub fn step_toward(&mut self, kind: StepKind, force: bool) -> Result<(), EngineError> {
        self.step(kind, force)
    }

    fn turn(&mut self, direction: TurnDirection) -> Result<(), EngineError> {
        self.map()?;
        logged("turn", self.camera.turn(direction))
    }

    pub fn turn_left(&mut self) -> Result<(), EngineError> {
        self.turn(TurnDirection::Left)
    }

    pub fn turn_right(&mut self) -> Result<(), EngineError> {
        self.turn(TurnDirection::Right)
    }

    /// Walking pace in seconds per square; `0` restores the default.
    pub fn set_walking_speed(&mut self, seconds_per_square: f32) -> Result<(), EngineError> {
        logged("set_walking_speed", self.camera.set_walking_speed(seconds_per_square))
    }

    /// Degrees per frame in `0..=90`; `0` restores the default.
    pub fn set_turning_speed(&mut self, degrees: f32) -> Result<(), EngineError> {
        logged("set_turning_speed", self.camera.set_turning_speed(degrees))
    }

    /// Frame delta in seconds used by [`advance`](Self::advance) and `draw`.
    pub fn set_delta_time(&mut self, seconds: f32) -> Result<(), EngineError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return logged("set_delta_time", Err(EngineError::InvalidDeltaTime(seconds)));
        }
        self.delta = seconds;
        Ok(())
    }

    pub fn delta_time(&self) -> f32 {
        self.delta
    }

    /// One frame of camera animation with the stored delta.
    pub fn advance(&mut self) -> Result<Option<MotionEvent>, EngineError> {
        self.advance_by(self.delta)
    }

    pub fn advance_by(&mut self, delta: f32) -> Result<Option<MotionEvent>, EngineError> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(EngineError::InvalidDeltaTime(delta));
        }
        self.map()?;
        Ok(self.camera.advance(delta))
    }

    // --- queries ---

    pub fn player_x(&self) -> Option<i32> {
        self.player_position().map(|p| p.x)
    }

    pub fn player_y(&self) -> Option<i32> {
        self.player_position().map(|p| p.y)
    }

    pub fn player_position(&self) -> Option<CellPos> {
        self.bank.current().map(|_| self.camera.position())
    }

    pub fn player_facing(&self) -> Option<Facing> {
        self.bank.current().map(|_| self.camera.facing())
    }

    pub fn motion(&self) -> Motion {
        self.camera.motion()
    }

    pub fn is_walking(&self) -> bool {
        self.camera.is_walking()
    }

    pub fn walk_direction(&self) -> Option<Facing> {
        self.camera.walk_direction()
    }

    pub fn walk_offset(&self) -> f32 {
        self.camera.walk_offset()
    }

    pub fn is_turning(&self) -> bool {
        self.camera.is_turning()
    }

    pub fn turn_direction(&self) -> Option<TurnDirection> {
        self.camera.turn_direction()
    }

    pub fn turn_offset(&self) -> f32 {
        self.camera.turn_offset()
    }
}

impl<B: RenderBackend + 'static> std::fmt::Debug for Engine<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("bank", &self.bank)
            .field("camera", &self.camera)
            .field("delta", &self.delta)
            .finish_non_exhaustive()
    }
}

fn logged<T>(op: &'static str, result: Result<T, EngineError>) -> Result<T, EngineError> {
    if let Err(e) = &result {
        tracing::debug!(op, error = %e, "command rejected");
    }
    result
}
