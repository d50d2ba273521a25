//! Tile Platformer headless runner
//!
//! Loads a level, drives the simulation with a scripted input pattern and
//! logs what happened. Useful for checking maps and tuning files without a
//! renderer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tile_platformer::consts::FRAME_RATE;
use tile_platformer::persistence::{load_catalog, load_map, save_map};
use tile_platformer::sim::{AssetCatalog, GameState, PhysicsEntity, TickInput, tick};
use tile_platformer::tuning::Tuning;

/// Headless tile platformer simulation
#[derive(Parser)]
#[command(version, about = "Runs a tile platformer level without rendering")]
struct Cli {
    /// Map document to load
    #[arg(default_value = "data/maps/0.json")]
    map: PathBuf,

    /// Asset catalog document (built-in catalog if omitted)
    #[arg(long, value_name = "PATH")]
    assets: Option<PathBuf>,

    /// Tuning overrides
    #[arg(long, value_name = "PATH")]
    tuning: Option<PathBuf>,

    /// RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Re-pick auto-tile variants before running
    #[arg(long)]
    auto_tile: bool,

    /// Write the (possibly auto-tiled) map here
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

/// Run right, hop regularly and dash now and then; turn around every 5 s
fn scripted_input(frame: u64) -> TickInput {
    let leg = frame / (5 * FRAME_RATE as u64);
    let going_right = leg % 2 == 0;
    TickInput {
        left: !going_right,
        right: going_right,
        jump: frame % 45 == 0,
        dash: frame % 150 == 75,
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let catalog = match &cli.assets {
        Some(path) => load_catalog(path).context("loading asset catalog")?,
        None => AssetCatalog::default(),
    };
    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path).context("loading tuning")?,
        None => Tuning::default(),
    };

    let mut map = load_map(&cli.map).with_context(|| format!("loading map {}", cli.map.display()))?;
    if cli.auto_tile {
        map.auto_tile();
    }
    if let Some(path) = &cli.save {
        save_map(&map, path).context("saving map")?;
    }

    let mut state = GameState::new(map, catalog, tuning, cli.seed);

    let mut jumps = 0;
    let mut shots = 0;
    let mut hits = 0;
    for frame in 0..cli.frames {
        let report = tick(&mut state, &scripted_input(frame));
        jumps += report.jumped as usize;
        shots += report.shots_fired;
        hits += report.player_hits;
        if report.player_hits > 0 {
            log::info!("Frame {frame}: player hit at {:?}", state.player.body.pos);
        }
        if frame % FRAME_RATE as u64 == 0 {
            log::debug!(
                "Frame {frame}: player {:?} ({}), {} particles, scroll {:?}",
                state.player.body.pos,
                state.player.image_asset(),
                state.particle_count(),
                state.camera.scroll
            );
        }
    }

    log::info!(
        "Simulated {} frames: player at {:?}, {} jumps, {} shots fired, {} hits taken, {} particles alive",
        state.time_ticks,
        state.player.body.pos,
        jumps,
        shots,
        hits,
        state.particle_count()
    );
    Ok(())
}
