#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session bootstrap that prepares, resumes and tears down a Wildlands game.

use log::info;
use wildlands_core::{Command, Event, TileGrid, WorldPoint};
use wildlands_system_spawning::{SpawnConfig, Spawning};
use wildlands_system_terrain::{TerrainConfig, TerrainError, TerrainGenerator};
use wildlands_world::{self as world, query, World};

/// Drives the world through the start and end of a session.
#[derive(Debug)]
pub struct Bootstrap {
    generator: TerrainGenerator,
    spawning: Spawning,
}

impl Bootstrap {
    /// Creates a bootstrap using the provided terrain and spawn tuning.
    #[must_use]
    pub fn new(terrain: TerrainConfig, spawn: SpawnConfig) -> Self {
        Self {
            generator: TerrainGenerator::new(terrain),
            spawning: Spawning::new(spawn),
        }
    }

    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Generator used for new games, shareable with a background worker.
    #[must_use]
    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Generates fresh terrain from `seed` and spawns the actor on it.
    pub fn new_game(
        &mut self,
        world: &mut World,
        columns: u32,
        rows: u32,
        seed: u64,
    ) -> Result<Vec<Event>, TerrainError> {
        let grid = self.generator.generate(columns, rows, seed)?;
        info!("starting a new {columns}x{rows} game from seed {seed}");
        Ok(self.start(world, grid))
    }

    /// Installs an already generated grid and spawns the actor on it.
    pub fn start(&mut self, world: &mut World, grid: TileGrid) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(world, Command::InstallTerrain { grid }, &mut events);

        let mut commands = Vec::new();
        self.spawning.handle(
            &events,
            query::tile_grid(world),
            query::movement_config(world).actor_size,
            &mut commands,
        );
        for command in commands {
            world::apply(world, command, &mut events);
        }
        events
    }

    /// Restores a saved session: installs the grid and places the actor where it was.
    #[must_use]
    pub fn resume(&self, world: &mut World, grid: TileGrid, position: WorldPoint) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(world, Command::InstallTerrain { grid }, &mut events);
        world::apply(world, Command::SpawnActor { position }, &mut events);
        events
    }

    /// Destroys the actor and the terrain, as when returning to the main menu.
    #[must_use]
    pub fn return_to_menu(&self, world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(world, Command::DespawnActor, &mut events);
        world::apply(world, Command::ClearTerrain, &mut events);
        events
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new(TerrainConfig::default(), SpawnConfig::default())
    }
}
