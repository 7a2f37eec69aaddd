#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic blob-based terrain generation for the Wildlands.
//!
//! Generation runs as a fixed sequence of passes over a [`TerrainCanvas`]:
//! mountain blobs, water blobs, a dirt transition pass around those features,
//! and finally a sparse obstacle pass. Every random draw comes from the
//! injected generator, so a seed fully determines the resulting grid.

mod background;

pub use background::{spawn_generation, PendingTerrain};

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wildlands_core::{GridError, Passability, TileGrid, TileKind};

/// Parameters for a single blob-stamping pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlobTuning {
    /// Blobs stamped per map tile; the count is `floor(columns * rows * density)`.
    pub density: f64,
    /// Smallest blob radius in tiles, inclusive.
    pub radius_min: u32,
    /// Largest blob radius in tiles, inclusive.
    pub radius_max: u32,
    /// Minimum intensity (1.0 at the centre, 0.0 at the rim) a cell needs to be filled.
    pub threshold: f64,
}

impl BlobTuning {
    /// Mountain ranges: frequent, wide blobs.
    #[must_use]
    pub const fn mountains() -> Self {
        Self {
            density: 0.003,
            radius_min: 4,
            radius_max: 12,
            threshold: 0.6,
        }
    }

    /// Lakes: few, small blobs with a higher fill threshold.
    #[must_use]
    pub const fn water() -> Self {
        Self {
            density: 0.0005,
            radius_min: 3,
            radius_max: 8,
            threshold: 0.7,
        }
    }

    /// Number of blobs stamped on a map of the provided size.
    #[must_use]
    pub fn blob_count(&self, columns: u32, rows: u32) -> u32 {
        let area = f64::from(columns) * f64::from(rows);
        let count = (area * self.density).floor();
        if count.is_finite() && count > 0.0 {
            count.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }

    fn radius_range(&self) -> (u32, u32) {
        if self.radius_min <= self.radius_max {
            (self.radius_min, self.radius_max)
        } else {
            (self.radius_max, self.radius_min)
        }
    }
}

/// Immutable configuration consumed by [`TerrainGenerator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Side length of a tile in world units.
    pub tile_length: f32,
    /// Mountain blob pass.
    pub mountains: BlobTuning,
    /// Water blob pass, stamped after mountains.
    pub water: BlobTuning,
    /// Chance that grass bordering water or mountains turns to dirt.
    pub dirt_chance: f64,
    /// Per-tile chance of a tree on grass or dirt.
    pub tree_chance: f64,
    /// Per-tile chance of a rock on grass or dirt.
    pub rock_chance: f64,
    /// Tile kinds that block the actor in the generated grid.
    pub passability: Passability,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            tile_length: 64.0,
            mountains: BlobTuning::mountains(),
            water: BlobTuning::water(),
            dirt_chance: 0.4,
            tree_chance: 0.02,
            rock_chance: 0.01,
            passability: Passability::default(),
        }
    }
}

/// Errors raised while producing terrain.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// Either requested dimension was zero.
    #[error("terrain dimensions {columns}x{rows} must both be positive")]
    InvalidDimension {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The finished canvas could not be turned into a grid.
    #[error("generated terrain is not a valid grid")]
    InvalidGrid(#[from] GridError),
    /// The background worker thread could not be started.
    #[error("failed to start the terrain worker")]
    WorkerSpawn(#[from] std::io::Error),
    /// The background worker stopped before publishing a grid.
    #[error("terrain worker stopped before publishing a grid")]
    WorkerDisconnected,
}

/// Mutable row-major tile buffer written by the generation passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainCanvas {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
}

impl TerrainCanvas {
    /// Creates a canvas covered in grass.
    pub fn new(columns: u32, rows: u32) -> Result<Self, TerrainError> {
        if columns == 0 || rows == 0 {
            return Err(TerrainError::InvalidDimension { columns, rows });
        }
        let count = usize::try_from(u64::from(columns) * u64::from(rows))
            .map_err(|_| TerrainError::InvalidDimension { columns, rows })?;
        Ok(Self {
            columns,
            rows,
            tiles: vec![TileKind::Grass; count],
        })
    }

    /// Number of columns on the canvas.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows on the canvas.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Row-major view over the tiles.
    #[must_use]
    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// Reads a tile; coordinates outside the canvas yield `None`.
    #[must_use]
    pub fn tile(&self, column: i64, row: i64) -> Option<TileKind> {
        self.index(column, row).map(|index| self.tiles[index])
    }

    /// Writes a tile; coordinates outside the canvas are ignored.
    pub fn set(&mut self, column: i64, row: i64, kind: TileKind) {
        if let Some(index) = self.index(column, row) {
            self.tiles[index] = kind;
        }
    }

    /// Reports whether any of the eight neighbours is water or mountain.
    #[must_use]
    pub fn borders_feature(&self, column: i64, row: i64) -> bool {
        NEIGHBOR_OFFSETS.iter().any(|(dc, dr)| {
            self.tile(column + dc, row + dr)
                .map_or(false, TileKind::is_feature)
        })
    }

    /// Freezes the canvas into an immutable grid.
    pub fn into_grid(
        self,
        tile_length: f32,
        passability: Passability,
    ) -> Result<TileGrid, TerrainError> {
        let grid = TileGrid::from_tiles(self.columns, self.rows, tile_length, self.tiles)?;
        Ok(grid.with_passability(passability))
    }

    fn index(&self, column: i64, row: i64) -> Option<usize> {
        if column < 0 || row < 0 || column >= i64::from(self.columns) || row >= i64::from(self.rows)
        {
            return None;
        }
        usize::try_from(row * i64::from(self.columns) + column).ok()
    }

    fn coords(&self) -> impl Iterator<Item = (i64, i64)> {
        let columns = i64::from(self.columns);
        (0..i64::from(self.rows)).flat_map(move |row| (0..columns).map(move |column| (column, row)))
    }
}

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Stamps circular blobs of `kind` onto the canvas and returns how many were placed.
///
/// Each blob draws a centre column, a centre row and a radius, in that order.
/// Cells inside the circle are filled when `1 - d²/r²` exceeds the threshold,
/// so blobs are solid at the core and ragged at the rim. Later blobs overwrite
/// earlier ones, including blobs from previous passes.
pub fn stamp_blobs<R>(
    canvas: &mut TerrainCanvas,
    tuning: &BlobTuning,
    kind: TileKind,
    rng: &mut R,
) -> u32
where
    R: Rng + ?Sized,
{
    let count = tuning.blob_count(canvas.columns(), canvas.rows());
    let (radius_min, radius_max) = tuning.radius_range();

    for _ in 0..count {
        let center_column = i64::from(rng.gen_range(0..canvas.columns()));
        let center_row = i64::from(rng.gen_range(0..canvas.rows()));
        let radius = i64::from(rng.gen_range(radius_min..=radius_max));
        let radius_sq = radius * radius;

        for row_offset in -radius..=radius {
            for column_offset in -radius..=radius {
                let distance_sq = row_offset * row_offset + column_offset * column_offset;
                if distance_sq >= radius_sq {
                    continue;
                }
                let intensity = 1.0 - distance_sq as f64 / radius_sq as f64;
                if intensity > tuning.threshold {
                    canvas.set(center_column + column_offset, center_row + row_offset, kind);
                }
            }
        }
    }

    count
}

/// Turns grass bordering water or mountains into dirt and returns how many tiles changed.
///
/// Neighbourhoods are read from a snapshot taken before the pass, so dirt
/// placed earlier in the sweep never influences later cells.
pub fn scatter_dirt<R>(canvas: &mut TerrainCanvas, chance: f64, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let chance = probability(chance);
    let snapshot = canvas.clone();
    let mut converted = 0;

    for (column, row) in snapshot.coords() {
        if snapshot.tile(column, row) != Some(TileKind::Grass) {
            continue;
        }
        if snapshot.borders_feature(column, row) && rng.gen_bool(chance) {
            canvas.set(column, row, TileKind::Dirt);
            converted += 1;
        }
    }

    converted
}

/// Scatters trees and rocks over grass and dirt and returns how many were placed.
pub fn scatter_obstacles<R>(
    canvas: &mut TerrainCanvas,
    tree_chance: f64,
    rock_chance: f64,
    rng: &mut R,
) -> usize
where
    R: Rng + ?Sized,
{
    let tree_chance = probability(tree_chance);
    let rock_chance = probability(rock_chance);
    if tree_chance == 0.0 && rock_chance == 0.0 {
        return 0;
    }

    let mut placed = 0;
    for (column, row) in canvas.coords() {
        if !matches!(
            canvas.tile(column, row),
            Some(TileKind::Grass | TileKind::Dirt)
        ) {
            continue;
        }
        let roll: f64 = rng.gen();
        let obstacle = if roll < tree_chance {
            TileKind::TreeObstacle
        } else if roll < tree_chance + rock_chance {
            TileKind::RockObstacle
        } else {
            continue;
        };
        canvas.set(column, row, obstacle);
        placed += 1;
    }

    placed
}

fn probability(chance: f64) -> f64 {
    if chance.is_nan() {
        0.0
    } else {
        chance.clamp(0.0, 1.0)
    }
}

fn tile_histogram(grid: &TileGrid) -> String {
    TileKind::ALL
        .iter()
        .map(|kind| format!("{kind:?}={}", grid.count(*kind)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Produces tile grids from seeds.
#[derive(Clone, Debug, Default)]
pub struct TerrainGenerator {
    config: TerrainConfig,
}

impl TerrainGenerator {
    /// Creates a generator bound to the provided configuration.
    #[must_use]
    pub fn new(config: TerrainConfig) -> Self {
        Self { config }
    }

    /// Configuration used by the generator.
    #[must_use]
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Generates a grid seeded from `seed`; equal seeds yield identical grids.
    pub fn generate(&self, columns: u32, rows: u32, seed: u64) -> Result<TileGrid, TerrainError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate_with(columns, rows, &mut rng)
    }

    /// Generates a grid drawing every random value from the provided generator.
    pub fn generate_with<R>(
        &self,
        columns: u32,
        rows: u32,
        rng: &mut R,
    ) -> Result<TileGrid, TerrainError>
    where
        R: Rng + ?Sized,
    {
        let mut canvas = TerrainCanvas::new(columns, rows)?;
        let config = &self.config;

        let mountains = stamp_blobs(&mut canvas, &config.mountains, TileKind::Mountain, rng);
        let lakes = stamp_blobs(&mut canvas, &config.water, TileKind::Water, rng);
        let dirt = scatter_dirt(&mut canvas, config.dirt_chance, rng);
        let obstacles =
            scatter_obstacles(&mut canvas, config.tree_chance, config.rock_chance, rng);

        let grid = canvas.into_grid(config.tile_length, config.passability)?;
        debug!(
            "generated {columns}x{rows} terrain: {mountains} mountain blobs, {lakes} water blobs, \
             {dirt} dirt tiles, {obstacles} obstacles; {}",
            tile_histogram(&grid)
        );
        Ok(grid)
    }
}
