use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tilescape_common::{Facing, SurfaceRef};
use tilescape_input::{Action, ActionBuffer, Pumped};
use tilescape_kernel::{Engine, EngineConfig, MotionEvent};
use tilescape_render::RecordingBackend;
use tilescape_tools::EngineInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilescape-cli", about = "Headless driver for the tilescape grid engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Engine config (.yaml, .yml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Map file (.json); the built-in demo map is used otherwise
    #[arg(short, long, global = true)]
    map: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info and the active config
    Info,
    /// Play a comma-separated list of moves, drawing every frame
    Walk {
        /// Moves: f, b, l, r (append ! to force), tl, tr, wait
        #[arg(long, default_value = "f,f,tr,f")]
        moves: String,
        /// Draw distance in cells; defaults to the config's view distance
        #[arg(short, long)]
        distance: Option<u32>,
        /// Give up after this many frames
        #[arg(long, default_value = "10000")]
        max_frames: u32,
    },
    /// Print the map's space ids and walkability
    Dump,
}

/// Map file layout: columns indexed `[x][y]`, plus a start pose.
#[derive(Debug, Deserialize)]
struct MapFile {
    columns: Vec<Vec<i32>>,
    #[serde(default)]
    start: (i32, i32),
    #[serde(default)]
    facing: i32,
    #[serde(default)]
    surfaces: Vec<SurfaceBinding>,
}

#[derive(Debug, Deserialize)]
struct SurfaceBinding {
    space: i32,
    #[serde(default)]
    floor: Option<u32>,
    #[serde(default)]
    ceiling: Option<u32>,
    #[serde(default)]
    wall: Option<u32>,
}

/// 7x7 room: walls around the edge, a pillar at (3,3), a cleared
/// obstacle of type 2 at (5,3).
fn demo_map() -> MapFile {
    let mut columns = vec![vec![0; 7]; 7];
    for i in 0..7 {
        columns[0][i] = 1;
        columns[6][i] = 1;
        columns[i][0] = 1;
        columns[i][6] = 1;
    }
    columns[3][3] = 1;
    columns[5][3] = 2;
    MapFile {
        columns,
        start: (1, 1),
        facing: 0,
        surfaces: vec![
            SurfaceBinding {
                space: 0,
                floor: Some(1),
                ceiling: Some(2),
                wall: None,
            },
            SurfaceBinding {
                space: 1,
                floor: None,
                ceiling: None,
                wall: Some(3),
            },
            SurfaceBinding {
                space: 2,
                floor: Some(1),
                ceiling: Some(2),
                wall: Some(4),
            },
        ],
    }
}

fn load_map(path: &Path) -> anyhow::Result<MapFile> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading map {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing map {}", path.display()))
}

fn build_engine(config: EngineConfig, map: MapFile) -> anyhow::Result<Engine<RecordingBackend>> {
    let mut engine = Engine::new(Rc::new(RecordingBackend::new()), config)?;
    let id = engine.add_map_columns(&map.columns)?;
    engine.set_current_map(id)?;
    for binding in &map.surfaces {
        engine.bind_floor(binding.space, binding.floor.map(SurfaceRef))?;
        engine.bind_ceiling(binding.space, binding.ceiling.map(SurfaceRef))?;
        engine.bind_wall(binding.space, binding.wall.map(SurfaceRef))?;
    }
    // type 2 is drawn as a wall but can be walked through
    if map.surfaces.iter().any(|b| b.space == 2) {
        for (x, column) in map.columns.iter().enumerate() {
            for (y, &space) in column.iter().enumerate() {
                if space == 2 {
                    engine.make_walkable(x as i32, y as i32)?;
                }
            }
        }
    }
    let built = engine.generate()?;
    tracing::info!(built, "map loaded");

    let facing = Facing::try_from(map.facing)?;
    engine.set_player_position(map.start.0, map.start.1, Some(facing))?;
    Ok(engine)
}

fn parse_moves(moves: &str) -> anyhow::Result<ActionBuffer> {
    moves
        .split(',')
        .filter(|m| !m.trim().is_empty())
        .map(|m| m.parse::<Action>().map_err(anyhow::Error::from))
        .collect()
}

fn walk(
    engine: &mut Engine<RecordingBackend>,
    mut buffer: ActionBuffer,
    distance: u32,
    max_frames: u32,
) -> anyhow::Result<()> {
    let mut frame = 0;
    while !buffer.is_empty() || engine.is_walking() || engine.is_turning() {
        if frame >= max_frames {
            anyhow::bail!("gave up after {max_frames} frames with {} moves left", buffer.len());
        }
        match buffer.pump(engine) {
            Pumped::Applied(action) => println!("[{frame:>5}] {action:?}"),
            Pumped::Dropped(action, err) => println!("[{frame:>5}] {action:?} rejected: {err}"),
            Pumped::Deferred(_) | Pumped::Empty => {}
        }

        let stats = engine.draw(distance, false)?;
        if let Some(event) = engine.advance()? {
            match event {
                MotionEvent::Arrived(pos) => println!(
                    "[{frame:>5}] arrived at ({}, {}); {} faces drawn",
                    pos.x, pos.y, stats.faces_drawn
                ),
                MotionEvent::TurnFinished(facing) => println!(
                    "[{frame:>5}] now facing {facing}; {} faces drawn",
                    stats.faces_drawn
                ),
            }
        }
        engine.backend().clear_calls();
        frame += 1;
    }
    println!("finished in {frame} frames");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let map = match &cli.map {
        Some(path) => load_map(path)?,
        None => demo_map(),
    };

    match cli.command {
        Commands::Info => {
            println!("tilescape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", tilescape_common::crate_info());
            println!("render: {}", tilescape_render::crate_info());
            println!("kernel: {}", tilescape_kernel::crate_info());
            println!("input: {}", tilescape_input::crate_info());
            println!("tools: {}", tilescape_tools::crate_info());
            println!("config: {config:?}");
            let engine = build_engine(config, map)?;
            println!("{}", EngineInspector::summary(&engine));
        }
        Commands::Walk {
            moves,
            distance,
            max_frames,
        } => {
            let distance = distance.unwrap_or(config.view_distance);
            let buffer = parse_moves(&moves)?;
            let mut engine = build_engine(config, map)?;
            walk(&mut engine, buffer, distance, max_frames)?;
            println!("{}", EngineInspector::summary(&engine));
            if let Some(dump) = EngineInspector::walk_dump(&engine) {
                print!("{dump}");
            }
        }
        Commands::Dump => {
            let engine = build_engine(config, map)?;
            println!("{}", EngineInspector::summary(&engine));
            if let Some(dump) = EngineInspector::map_dump(&engine) {
                println!("spaces:");
                print!("{dump}");
            }
            if let Some(dump) = EngineInspector::walk_dump(&engine) {
                println!("walkable:");
                print!("{dump}");
            }
            for id in EngineInspector::list_spaces(&engine) {
                if let Some(info) = EngineInspector::inspect_space(&engine, id) {
                    println!("{info}");
                }
            }
        }
    }

    Ok(())
}
