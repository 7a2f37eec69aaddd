#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that picks the actor's starting position.

use log::{debug, warn};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use wildlands_core::{ActorBox, Command, Event, TileGrid, WorldPoint};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seed for the generator that picks among walkable positions.
    pub rng_seed: u64,
    /// Top-left corner used when the map offers no walkable position.
    pub fallback: WorldPoint,
}

impl SpawnConfig {
    /// Creates a new configuration using the provided seed and fallback point.
    #[must_use]
    pub const fn new(rng_seed: u64, fallback: WorldPoint) -> Self {
        Self { rng_seed, fallback }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self::new(0, WorldPoint::new(640.0, 360.0))
    }
}

/// Pure system that emits a spawn command whenever new terrain is installed.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    fallback: WorldPoint,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: SpawnConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            fallback: config.fallback,
        }
    }

    /// Consumes world events and emits a spawn command for each terrain installation.
    pub fn handle(
        &mut self,
        events: &[Event],
        grid: Option<&TileGrid>,
        actor_size: f32,
        out: &mut Vec<Command>,
    ) {
        let Some(grid) = grid else {
            return;
        };
        for event in events {
            if let Event::TerrainInstalled { .. } = event {
                let position = self.choose(grid, actor_size);
                out.push(Command::SpawnActor { position });
            }
        }
    }

    /// Picks a walkable tile corner where an actor of `actor_size` fits.
    ///
    /// Falls back to the configured point when no such position exists.
    pub fn choose(&mut self, grid: &TileGrid, actor_size: f32) -> WorldPoint {
        let candidates = spawn_candidates(grid, actor_size);
        match candidates.choose(&mut self.rng) {
            Some(position) => {
                debug!(
                    "spawning at ({}, {}) out of {} candidates",
                    position.x,
                    position.y,
                    candidates.len()
                );
                *position
            }
            None => {
                warn!(
                    "no walkable spawn position on a {}x{} map; using fallback ({}, {})",
                    grid.columns(),
                    grid.rows(),
                    self.fallback.x,
                    self.fallback.y
                );
                self.fallback
            }
        }
    }
}

/// Lists walkable tile corners whose actor box overlaps no impassable tile.
#[must_use]
pub fn spawn_candidates(grid: &TileGrid, actor_size: f32) -> Vec<WorldPoint> {
    grid.walkable_positions()
        .into_iter()
        .filter(|position| grid.is_region_clear(&ActorBox::new(*position, actor_size).rect()))
        .collect()
}
