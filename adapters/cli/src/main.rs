#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates, walks and saves Wildlands sessions.

mod ascii;
mod config;
mod script;
mod session;

use std::{
    cell::RefCell,
    io,
    path::PathBuf,
    rc::Rc,
    thread,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info, warn};
use wildlands_core::{Event, TileCoord, TileGrid, TileKind};
use wildlands_persistence::{SaveGame, SlotStatus, SlotStore};
use wildlands_rendering::{Camera, FrameInput, Presentation, RenderingBackend, CLEAR_COLOR};
use wildlands_system_bootstrap::Bootstrap;
use wildlands_system_terrain::{spawn_generation, TerrainGenerator};
use wildlands_world::{query, World};

use crate::{ascii::AsciiBackend, config::GameConfig, session::Session};

const WINDOW_TITLE: &str = "Wildlands";
const POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, Parser)]
#[command(name = "wildlands", about = "Generate and explore Wildlands maps")]
struct Cli {
    /// TOML file overriding the default tuning.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the save slots.
    #[arg(long, global = true, default_value = ".")]
    save_dir: PathBuf,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Generate a new map, spawn the actor and report the result.
    Generate(GenerateArgs),
    /// Replay a scripted walk and print the final frame.
    Walk(WalkArgs),
    /// Resume a saved game and print its first frame.
    Load {
        /// Slot to resume.
        #[arg(long)]
        slot: u8,
    },
    /// List every save slot.
    Slots,
    /// Rename a saved game.
    Rename {
        /// Slot holding the save.
        #[arg(long)]
        slot: u8,
        /// New display name.
        #[arg(long)]
        name: String,
    },
}

#[derive(Debug, Args)]
struct MapArgs {
    /// Seed for terrain generation; derived from the clock when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of tile columns; overrides the configuration.
    #[arg(long)]
    columns: Option<u32>,
    /// Number of tile rows; overrides the configuration.
    #[arg(long)]
    rows: Option<u32>,
}

#[derive(Debug, Args)]
struct SaveArgs {
    /// Slot to write the finished session to.
    #[arg(long)]
    save_slot: Option<u8>,
    /// Name of the save; without a slot the first empty slot is used.
    #[arg(long)]
    save_name: Option<String>,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[command(flatten)]
    map: MapArgs,
    /// Generate on a worker thread and poll for the result.
    #[arg(long)]
    background: bool,
    /// Print the whole map as text.
    #[arg(long)]
    print_map: bool,
    #[command(flatten)]
    save: SaveArgs,
}

#[derive(Debug, Args)]
struct WalkArgs {
    #[command(flatten)]
    map: MapArgs,
    /// Resume from a save slot instead of generating a map.
    #[arg(long, conflicts_with = "seed")]
    from_slot: Option<u8>,
    /// Comma separated steps such as `R:30,UL*:10,+`.
    #[arg(long, default_value = "")]
    script: String,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    #[command(flatten)]
    save: SaveArgs,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = GameConfig::load(cli.config.as_deref())?;
    let store = SlotStore::new(cli.save_dir);

    match cli.command {
        CliCommand::Generate(args) => generate(&config, &store, &args),
        CliCommand::Walk(args) => walk(&config, &store, &args),
        CliCommand::Load { slot } => load(&config, &store, slot),
        CliCommand::Slots => list_slots(&store),
        CliCommand::Rename { slot, name } => {
            store.rename(slot, &name)?;
            println!("Renamed slot {slot} to \"{name}\"");
            Ok(())
        }
    }
}

fn generate(config: &GameConfig, store: &SlotStore, args: &GenerateArgs) -> Result<()> {
    let (columns, rows, seed) = map_request(config, &args.map);
    let mut world = World::with_movement(config.movement.clone());
    let mut bootstrap = Bootstrap::new(config.terrain.clone(), config.spawn);
    println!("{}", bootstrap.welcome_banner(&world));

    let events = if args.background {
        let grid = generate_in_background(bootstrap.generator(), columns, rows, seed)?;
        bootstrap.start(&mut world, grid)
    } else {
        bootstrap.new_game(&mut world, columns, rows, seed)?
    };
    report(&events);

    let grid = query::tile_grid(&world).context("terrain was not installed")?;
    println!("Generated {columns}x{rows} map from seed {seed}");
    for kind in TileKind::ALL {
        println!("{kind:?}: {}", grid.count(kind));
    }
    if let Some(position) = query::actor_position(&world) {
        println!("Actor at ({:.1}, {:.1})", position.x, position.y);
    }
    if args.print_map {
        print!("{}", map_text(grid));
    }

    save_session(store, &args.save, &world, &format!("Seed {seed}"))
}

fn walk(config: &GameConfig, store: &SlotStore, args: &WalkArgs) -> Result<()> {
    let frames = script::parse(&args.script)?;
    let mut world = World::with_movement(config.movement.clone());
    let mut bootstrap = Bootstrap::new(config.terrain.clone(), config.spawn);

    let (events, name) = match args.from_slot {
        Some(slot) => {
            let game = store.load(slot)?;
            let events = resume(config, &bootstrap, &mut world, &game)?;
            (events, game.save_name)
        }
        None => {
            let (columns, rows, seed) = map_request(config, &args.map);
            let events = bootstrap.new_game(&mut world, columns, rows, seed)?;
            (events, format!("Seed {seed}"))
        }
    };
    report(&events);

    let session = present(config, world, frames, Duration::from_millis(args.frame_ms))?;
    if let Some(position) = query::actor_position(&session.world) {
        println!("Actor at ({:.1}, {:.1})", position.x, position.y);
    }
    save_session(store, &args.save, &session.world, &name)
}

fn load(config: &GameConfig, store: &SlotStore, slot: u8) -> Result<()> {
    let game = store.load(slot)?;
    let bootstrap = Bootstrap::new(config.terrain.clone(), config.spawn);
    let mut world = World::with_movement(config.movement.clone());
    let events = resume(config, &bootstrap, &mut world, &game)?;
    report(&events);

    println!("Loaded \"{}\" from slot {slot}", game.save_name);
    if let Some(position) = query::actor_position(&world) {
        println!("Actor at ({:.1}, {:.1})", position.x, position.y);
    }
    let _session = present(config, world, Vec::new(), Duration::ZERO)?;
    Ok(())
}

fn list_slots(store: &SlotStore) -> Result<()> {
    for summary in store.list()? {
        match summary.status {
            SlotStatus::Empty => println!("Empty Slot {}", summary.slot),
            SlotStatus::Saved(name) => println!("Slot {}: {name}", summary.slot),
            SlotStatus::Corrupted => println!("Corrupted Slot {}", summary.slot),
        }
    }
    Ok(())
}

fn map_request(config: &GameConfig, args: &MapArgs) -> (u32, u32, u64) {
    let columns = args.columns.unwrap_or(config.map.columns);
    let rows = args.rows.unwrap_or(config.map.rows);
    let seed = args.seed.unwrap_or_else(clock_seed);
    (columns, rows, seed)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn generate_in_background(
    generator: &TerrainGenerator,
    columns: u32,
    rows: u32,
    seed: u64,
) -> Result<TileGrid> {
    let started = Instant::now();
    let mut pending = spawn_generation(generator.clone(), columns, rows, seed)?;
    loop {
        if let Some(outcome) = pending.poll() {
            info!("background generation finished in {:?}", started.elapsed());
            return Ok(outcome?);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn resume(
    config: &GameConfig,
    bootstrap: &Bootstrap,
    world: &mut World,
    game: &SaveGame,
) -> Result<Vec<Event>> {
    let grid = game
        .restore_grid(config.terrain.tile_length, config.terrain.passability)
        .with_context(|| format!("save \"{}\" holds an unusable map", game.save_name))?;
    let position = game.position();
    let events = bootstrap.resume(world, grid, position);
    let rejection = events.iter().find_map(|event| match event {
        Event::SpawnRejected { reason, .. } => Some(*reason),
        _ => None,
    });
    if let Some(reason) = rejection {
        bail!(
            "save \"{}\" cannot place the actor at ({:.1}, {:.1}): {reason}",
            game.save_name,
            position.x,
            position.y
        );
    }
    Ok(events)
}

fn present(
    config: &GameConfig,
    world: World,
    frames: Vec<FrameInput>,
    frame_time: Duration,
) -> Result<Session> {
    let camera = Camera::new(&config.camera)?;
    let session = Rc::new(RefCell::new(Session::new(world, camera)));
    let scene = session.borrow().scene();
    let backend = AsciiBackend::new(frames, frame_time, io::stdout().lock());

    let shared = Rc::clone(&session);
    backend.run(
        Presentation::new(WINDOW_TITLE, CLEAR_COLOR, scene),
        move |dt, input, scene| {
            let mut session = shared.borrow_mut();
            session.advance(dt, input);
            *scene = session.scene();
        },
    )?;

    Rc::try_unwrap(session)
        .map(RefCell::into_inner)
        .map_err(|_| anyhow::anyhow!("rendering backend kept the session alive"))
}

fn save_session(
    store: &SlotStore,
    args: &SaveArgs,
    world: &World,
    default_name: &str,
) -> Result<()> {
    if args.save_slot.is_none() && args.save_name.is_none() {
        return Ok(());
    }

    let grid = query::tile_grid(world).context("there is no terrain to save")?;
    let position = query::actor_position(world).context("there is no actor to save")?;
    let name = args.save_name.as_deref().unwrap_or(default_name);
    let game = SaveGame::capture(name, grid, position);
    let slot = match args.save_slot {
        Some(slot) => {
            let path = store.save(slot, &game)?;
            debug!("wrote {}", path.display());
            slot
        }
        None => store.save_to_first_empty(&game)?,
    };
    println!("Saved \"{name}\" to slot {slot}");
    Ok(())
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::SpawnRejected { position, reason } => {
                warn!("actor could not be placed at {position:?}: {reason}");
            }
            other => debug!("{other:?}"),
        }
    }
}

fn map_text(grid: &TileGrid) -> String {
    let mut text = String::with_capacity((grid.columns() as usize + 1) * grid.rows() as usize);
    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            if let Some(kind) = grid.tile(TileCoord::new(column, row)) {
                text.push(ascii::glyph(kind));
            }
        }
        text.push('\n');
    }
    text
}
