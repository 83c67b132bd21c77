use std::fmt::Write as _;
use tilescape_common::{BatchId, CellPos, Facing, SpaceId, SurfaceRef};
use tilescape_kernel::{Engine, MapId, Motion, SurfaceSlot};
use tilescape_render::RenderBackend;

/// Engine inspector for developer tooling.
///
/// Read-only queries against engine state for debugging and the CLI.
pub struct EngineInspector;

impl EngineInspector {
    /// Produce a summary of the engine state.
    pub fn summary<B: RenderBackend + 'static>(engine: &Engine<B>) -> EngineSummary {
        let bank = engine.bank();
        let camera = engine.camera();
        EngineSummary {
            current_map: bank.current_id(),
            map_size: engine.map_size(),
            maps_loaded: bank.len(),
            capacity: bank.capacity(),
            position: engine.player_position(),
            facing: engine.player_facing(),
            motion: camera.motion(),
            seconds_per_square: camera.seconds_per_square(),
            turn_speed: camera.turn_speed(),
            delta: engine.delta_time(),
            batches: bank.current().map_or(0, |m| m.spaces.batch_count()),
        }
    }

    /// Bindings and batch of one space type on the current map.
    pub fn inspect_space<B: RenderBackend + 'static>(engine: &Engine<B>, id: SpaceId) -> Option<SpaceInfo> {
        engine.space_entry(id).map(|space| SpaceInfo {
            id,
            floor: space.surface(SurfaceSlot::Floor),
            ceiling: space.surface(SurfaceSlot::Ceiling),
            wall: space.surface(SurfaceSlot::Wall),
            batch: space.batch().map(|b| b.id()),
            faces: space.batch().map_or(0, |b| b.face_count()),
        })
    }

    /// Registered space ids of the current map, ascending.
    pub fn list_spaces<B: RenderBackend + 'static>(engine: &Engine<B>) -> Vec<SpaceId> {
        engine
            .bank()
            .current()
            .map(|m| m.spaces.iter().map(|s| s.id()).collect())
            .unwrap_or_default()
    }

    /// Space ids of the current map, one row per y with north at the top.
    pub fn map_dump<B: RenderBackend + 'static>(engine: &Engine<B>) -> Option<String> {
        let (width, height) = engine.map_size()?;
        let cell_width = (0..width)
            .flat_map(|x| (0..height).map(move |y| (x, y)))
            .filter_map(|(x, y)| engine.space(x, y))
            .map(|id| id.0.to_string().len())
            .max()
            .unwrap_or(1);

        let mut out = String::new();
        for y in (0..height).rev() {
            let row: Vec<String> = (0..width)
                .map(|x| {
                    let id = engine.space(x, y).map_or(0, |s| s.0);
                    format!("{id:>cell_width$}")
                })
                .collect();
            let _ = writeln!(out, "{}", row.join(" "));
        }
        Some(out)
    }

    /// Walkability of the current map: `.` open, `#` blocked, camera as an
    /// arrow. North at the top.
    pub fn walk_dump<B: RenderBackend + 'static>(engine: &Engine<B>) -> Option<String> {
        let (width, height) = engine.map_size()?;
        let camera = engine.player_position();
        let facing = engine.player_facing();

        let mut out = String::new();
        for y in (0..height).rev() {
            for x in 0..width {
                let c = match facing {
                    Some(f) if camera == Some(CellPos::new(x, y)) => arrow(f),
                    _ if engine.is_walkable(x, y) => '.',
                    _ => '#',
                };
                out.push(c);
            }
            out.push('\n');
        }
        Some(out)
    }
}

fn arrow(facing: Facing) -> char {
    match facing {
        Facing::North => '^',
        Facing::East => '>',
        Facing::South => 'v',
        Facing::West => '<',
    }
}

/// Summary of engine state for the inspector.
#[derive(Debug, Clone)]
pub struct EngineSummary {
    pub current_map: Option<MapId>,
    pub map_size: Option<(i32, i32)>,
    pub maps_loaded: usize,
    pub capacity: usize,
    pub position: Option<CellPos>,
    pub facing: Option<Facing>,
    pub motion: Motion,
    pub seconds_per_square: f32,
    pub turn_speed: f32,
    pub delta: f32,
    pub batches: usize,
}

impl std::fmt::Display for EngineSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Engine: maps={}/{}", self.maps_loaded, self.capacity)?;
        match (self.current_map, self.map_size) {
            (Some(id), Some((w, h))) => write!(f, " current={id} ({w}x{h}) batches={}", self.batches)?,
            _ => write!(f, " current=none")?,
        }
        if let (Some(p), Some(facing)) = (self.position, self.facing) {
            write!(f, " camera=({}, {}) facing={facing}", p.x, p.y)?;
        }
        match self.motion {
            Motion::Idle => write!(f, " idle")?,
            Motion::Walking { direction, offset } => write!(f, " walking {direction} offset={offset:.3}")?,
            Motion::Turning {
                direction, offset, ..
            } => write!(f, " turning {direction:?} offset={offset:.1}")?,
        }
        write!(
            f,
            " speed={}s/sq turn={}deg delta={:.4}",
            self.seconds_per_square, self.turn_speed, self.delta
        )
    }
}

/// Detailed info about a single space type.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceInfo {
    pub id: SpaceId,
    pub floor: Option<SurfaceRef>,
    pub ceiling: Option<SurfaceRef>,
    pub wall: Option<SurfaceRef>,
    pub batch: Option<BatchId>,
    pub faces: usize,
}

impl std::fmt::Display for SpaceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |s: Option<SurfaceRef>| s.map_or_else(|| "-".to_string(), |s| s.0.to_string());
        write!(
            f,
            "Space {} floor={} ceiling={} wall={}",
            self.id.0,
            show(self.floor),
            show(self.ceiling),
            show(self.wall)
        )?;
        match self.batch {
            Some(b) => write!(f, " batch={} faces={}", b.0, self.faces),
            None => write!(f, " batch=none"),
        }
    }
}
