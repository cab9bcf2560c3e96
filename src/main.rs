//! Roommaze - Entry Point
//!
//! Parses the command line, generates a maze and writes it to disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use roommaze::save::{save_map, save_room_list, RoomList};
use roommaze::world::generation::{generate_seeded, DimRange, GenConfig, RoomSize};
use roommaze::world::paint_region;

/// Generate a room-and-corridor maze
#[derive(Parser, Debug)]
#[command(name = "roommaze")]
#[command(author, version, about = "Generate a room-and-corridor maze", long_about = None)]
#[command(disable_help_flag = true)]
struct Args {
    /// File the map is written to
    output: PathBuf,

    /// Final (end) room size
    #[arg(short = 'f', long = "final", num_args = 2, value_names = ["ROWS", "COLS"],
          value_parser = clap::value_parser!(i32).range(1..))]
    final_room: Option<Vec<i32>>,

    /// Start room size
    #[arg(short = 's', long = "start", num_args = 2, value_names = ["ROWS", "COLS"],
          value_parser = clap::value_parser!(i32).range(1..))]
    start_room: Option<Vec<i32>>,

    /// Maze size
    #[arg(short = 'd', long = "dims", num_args = 2, value_names = ["ROWS", "COLS"],
          value_parser = clap::value_parser!(i32).range(1..))]
    dims: Option<Vec<i32>>,

    /// Number of rooms between start and end
    #[arg(short = 'm', long = "mid-rooms")]
    mid_rooms: Option<usize>,

    /// Side length range of mid rooms
    #[arg(long = "mid-dims", num_args = 2, value_names = ["MIN", "MAX"],
          value_parser = clap::value_parser!(i32).range(1..))]
    mid_dims: Option<Vec<i32>>,

    /// Number of dead-end rooms
    #[arg(short = 'e', long = "dead-ends")]
    dead_ends: Option<usize>,

    /// Side length range of dead-end rooms
    #[arg(long = "dead-end-dims", num_args = 2, value_names = ["MIN", "MAX"],
          value_parser = clap::value_parser!(i32).range(1..))]
    dead_end_dims: Option<Vec<i32>>,

    /// Resamples allowed when a room overlaps another
    #[arg(short = 'r', long = "overlap-retries")]
    overlap_retries: Option<u32>,

    /// Resamples allowed when a room leaves the grid
    #[arg(short = 'o', long = "bounds-retries")]
    bounds_retries: Option<u32>,

    /// Fuse overlapping rooms into one open area
    #[arg(long = "merge")]
    merge: bool,

    /// RNG seed (random if omitted)
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// RON file with generation settings; flags take precedence
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Also write the placed rooms as JSON
    #[arg(long = "rooms-json", value_name = "FILE")]
    rooms_json: Option<PathBuf>,

    /// Paint everything reachable from the start room with this palette
    #[arg(long = "paint", value_name = "PALETTE")]
    paint: Option<i16>,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Print help
    #[arg(short = '?', long = "help", action = ArgAction::Help)]
    help: Option<bool>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "warn" }),
    )
    .init();

    let config = build_config(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Starting roommaze v{} with seed {}", env!("CARGO_PKG_VERSION"), seed);

    let mut dungeon = generate_seeded(seed, &config).context("Maze generation failed")?;

    if let Some(palette) = args.paint {
        let origin = dungeon.start_room().map(|start| (start.room.x, start.room.y));
        if let Some(origin) = origin {
            let painted = paint_region(&mut dungeon.map, origin, palette);
            log::info!("Painted {} tiles reachable from {:?}", painted, origin);
        }
    }

    save_map(&dungeon.map, &args.output)
        .with_context(|| format!("Failed to write map to {}", args.output.display()))?;

    if let Some(path) = &args.rooms_json {
        save_room_list(&RoomList::from_dungeon(&dungeon), path)
            .with_context(|| format!("Failed to write room list to {}", path.display()))?;
    }

    Ok(())
}

/// Start from the config file (or defaults) and apply the flags on top
fn build_config(args: &Args) -> Result<GenConfig> {
    let mut config = match &args.config {
        Some(path) => GenConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => GenConfig::default(),
    };

    if let Some([rows, cols]) = pair(&args.dims) {
        config.rows = rows;
        config.cols = cols;
    }
    if let Some([rows, cols]) = pair(&args.start_room) {
        config.start_room = RoomSize::new(rows, cols);
    }
    if let Some([rows, cols]) = pair(&args.final_room) {
        config.end_room = RoomSize::new(rows, cols);
    }
    if let Some([min, max]) = pair(&args.mid_dims) {
        config.mid_dims = DimRange::new(min, max);
    }
    if let Some([min, max]) = pair(&args.dead_end_dims) {
        config.dead_end_dims = DimRange::new(min, max);
    }
    if let Some(n) = args.mid_rooms {
        config.mid_rooms = n;
    }
    if let Some(n) = args.dead_ends {
        config.dead_ends = n;
    }
    if let Some(n) = args.overlap_retries {
        config.overlap_retries = n;
    }
    if let Some(n) = args.bounds_retries {
        config.bounds_retries = n;
    }
    if args.merge {
        config.merge_overlaps = true;
    }

    config.validate().context("Invalid generation settings")?;
    log::debug!("Generation config: {:?}", config);
    Ok(config)
}

/// Two-valued flags arrive as a Vec of exactly two
fn pair(values: &Option<Vec<i32>>) -> Option<[i32; 2]> {
    match values.as_deref() {
        Some(&[a, b]) => Some([a, b]),
        _ => None,
    }
}
