#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wildlands engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually happened. The tile layout itself lives in [`TileGrid`], which is
//! immutable once constructed and can therefore be shared freely between the
//! simulation and any presentation layer.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the Wildlands.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Publishes a fully generated or restored tile grid to the world.
    InstallTerrain {
        /// Grid that replaces any previously installed terrain.
        grid: TileGrid,
    },
    /// Drops the installed terrain together with the actor standing on it.
    ClearTerrain,
    /// Places the actor with its top-left corner at the provided position.
    SpawnActor {
        /// Requested top-left corner of the actor's bounding box.
        position: WorldPoint,
    },
    /// Moves the actor using a velocity integrated over the provided delta time.
    MoveActor {
        /// Velocity in world units per second, already normalised and scaled.
        velocity: WorldVector,
        /// Duration of simulated time covered by the movement.
        dt: Duration,
    },
    /// Removes the actor from the world.
    DespawnActor,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new tile grid became visible to the simulation.
    TerrainInstalled {
        /// Number of tile columns in the installed grid.
        columns: u32,
        /// Number of tile rows in the installed grid.
        rows: u32,
    },
    /// Confirms that the terrain was removed.
    TerrainCleared,
    /// Confirms that the actor entered the world.
    ActorSpawned {
        /// Top-left corner of the spawned actor.
        position: WorldPoint,
    },
    /// Reports that a spawn request was refused.
    SpawnRejected {
        /// Position provided in the spawn request.
        position: WorldPoint,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that the actor changed position.
    ActorMoved {
        /// Top-left corner before the move.
        from: WorldPoint,
        /// Top-left corner after collision resolution.
        to: WorldPoint,
    },
    /// Confirms that the actor was removed.
    ActorDespawned,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SpawnError {
    /// No terrain has been installed yet.
    #[error("no terrain is installed")]
    MissingTerrain,
    /// The actor's bounding box would extend beyond the map.
    #[error("spawn position lies outside the map")]
    OutOfBounds,
    /// The actor's bounding box would overlap an impassable tile.
    #[error("spawn position overlaps an impassable tile")]
    Blocked,
}

/// Closed set of terrain tiles that can appear in a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileKind {
    /// Lakes and ponds.
    Water,
    /// Base terrain covering most of the map.
    Grass,
    /// Transitional ground bordering mountains and water.
    Dirt,
    /// Rocky high ground.
    Mountain,
    /// Single tree blocking its tile.
    TreeObstacle,
    /// Single boulder blocking its tile.
    RockObstacle,
}

impl TileKind {
    /// Every tile kind in persisted id order.
    pub const ALL: [TileKind; 6] = [
        TileKind::Water,
        TileKind::Grass,
        TileKind::Dirt,
        TileKind::Mountain,
        TileKind::TreeObstacle,
        TileKind::RockObstacle,
    ];

    /// Stable numeric identifier used by the persistence boundary.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Water => 0,
            Self::Grass => 1,
            Self::Dirt => 2,
            Self::Mountain => 3,
            Self::TreeObstacle => 4,
            Self::RockObstacle => 5,
        }
    }

    /// Resolves a persisted identifier, returning `None` for unknown values.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Water),
            1 => Some(Self::Grass),
            2 => Some(Self::Dirt),
            3 => Some(Self::Mountain),
            4 => Some(Self::TreeObstacle),
            5 => Some(Self::RockObstacle),
            _ => None,
        }
    }

    /// Canonical classification: water, mountains and obstacles block movement.
    #[must_use]
    pub const fn is_impassable(self) -> bool {
        matches!(
            self,
            Self::Water | Self::Mountain | Self::TreeObstacle | Self::RockObstacle
        )
    }

    /// Reports whether the tile is a landscape feature that borders dirt.
    #[must_use]
    pub const fn is_feature(self) -> bool {
        matches!(self, Self::Water | Self::Mountain)
    }

    const fn bit(self) -> u8 {
        1 << self.id()
    }
}

/// Set of tile kinds that block the actor.
///
/// Serialises as a list of tile kinds so configuration files can spell the
/// set out explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<TileKind>", into = "Vec<TileKind>")]
pub struct Passability {
    impassable_mask: u8,
}

impl Passability {
    /// Builds a set where exactly the provided kinds are impassable.
    #[must_use]
    pub fn from_impassable<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = TileKind>,
    {
        let impassable_mask = kinds.into_iter().fold(0, |mask, kind| mask | kind.bit());
        Self { impassable_mask }
    }

    /// Reports whether the provided kind blocks movement under this set.
    #[must_use]
    pub const fn is_impassable(&self, kind: TileKind) -> bool {
        self.impassable_mask & kind.bit() != 0
    }

    /// Lists the impassable kinds in id order.
    #[must_use]
    pub fn impassable_kinds(&self) -> Vec<TileKind> {
        TileKind::ALL
            .into_iter()
            .filter(|kind| self.is_impassable(*kind))
            .collect()
    }
}

impl Default for Passability {
    fn default() -> Self {
        Self::from_impassable(
            TileKind::ALL
                .into_iter()
                .filter(|kind| kind.is_impassable()),
        )
    }
}

impl From<Vec<TileKind>> for Passability {
    fn from(kinds: Vec<TileKind>) -> Self {
        Self::from_impassable(kinds)
    }
}

impl From<Passability> for Vec<TileKind> {
    fn from(passability: Passability) -> Self {
        passability.impassable_kinds()
    }
}

/// Location of a single tile expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Point in world space measured in world units from the map's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate growing to the right.
    pub x: f32,
    /// Vertical coordinate growing downwards.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new world point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the point translated by the provided vector.
    #[must_use]
    pub fn offset(self, vector: WorldVector) -> Self {
        Self::new(self.x + vector.x, self.y + vector.y)
    }
}

/// Displacement or velocity in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldVector {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl WorldVector {
    /// Vector with both components set to zero.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both components by the provided factor.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// Axis-aligned rectangle in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldRect {
    origin: WorldPoint,
    width: f32,
    height: f32,
}

impl WorldRect {
    /// Creates a rectangle from its top-left corner and extent.
    #[must_use]
    pub const fn new(origin: WorldPoint, width: f32, height: f32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.origin.x
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.origin.y
    }

    /// Right edge (exclusive).
    #[must_use]
    pub fn right(&self) -> f32 {
        self.origin.x + self.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.height
    }

    /// Reports whether the two rectangles share any interior area.
    #[must_use]
    pub fn intersects(&self, other: &WorldRect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Square bounding box of the actor, anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorBox {
    origin: WorldPoint,
    size: f32,
}

impl ActorBox {
    /// Creates a new actor box.
    #[must_use]
    pub const fn new(origin: WorldPoint, size: f32) -> Self {
        Self { origin, size }
    }

    /// Top-left corner of the box.
    #[must_use]
    pub const fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Side length of the box.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.origin.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.origin.y
    }

    /// Right edge (exclusive).
    #[must_use]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> WorldPoint {
        let half = self.size / 2.0;
        WorldPoint::new(self.origin.x + half, self.origin.y + half)
    }

    /// Returns a copy of the box moved to the provided horizontal coordinate.
    #[must_use]
    pub const fn with_x(self, x: f32) -> Self {
        Self::new(WorldPoint::new(x, self.origin.y), self.size)
    }

    /// Returns a copy of the box moved to the provided vertical coordinate.
    #[must_use]
    pub const fn with_y(self, y: f32) -> Self {
        Self::new(WorldPoint::new(self.origin.x, y), self.size)
    }

    /// Rectangle covered by the box.
    #[must_use]
    pub const fn rect(&self) -> WorldRect {
        WorldRect::new(self.origin, self.size, self.size)
    }
}

/// Inclusive range of tiles covered by a world rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileSpan {
    /// First covered column.
    pub first_column: u32,
    /// Last covered column, inclusive.
    pub last_column: u32,
    /// First covered row.
    pub first_row: u32,
    /// Last covered row, inclusive.
    pub last_row: u32,
}

impl TileSpan {
    /// Iterates over every tile coordinate in the span in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> {
        let (first_column, last_column) = (self.first_column, self.last_column);
        (self.first_row..=self.last_row).flat_map(move |row| {
            (first_column..=last_column).map(move |column| TileCoord::new(column, row))
        })
    }
}

/// Tile reported by the render query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileSample {
    /// Grid coordinate of the tile.
    pub coord: TileCoord,
    /// Terrain stored at the coordinate.
    pub kind: TileKind,
    /// World-space rectangle covered by the tile.
    pub bounds: WorldRect,
}

/// Errors raised while constructing or reconstructing a [`TileGrid`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GridError {
    /// Either dimension was zero.
    #[error("grid dimensions {columns}x{rows} must both be positive")]
    InvalidDimension {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The tile length was zero, negative or not finite.
    #[error("tile length {0} must be a positive finite number")]
    InvalidTileLength(f32),
    /// A flat tile buffer did not match the declared dimensions.
    #[error("expected {expected} tiles but received {actual}")]
    TileCountMismatch {
        /// Number of tiles implied by the dimensions.
        expected: usize,
        /// Number of tiles supplied.
        actual: usize,
    },
    /// A persisted array held the wrong number of rows.
    #[error("expected {expected} rows but received {actual}")]
    RowCountMismatch {
        /// Declared row count.
        expected: u32,
        /// Number of rows supplied.
        actual: usize,
    },
    /// A persisted row held the wrong number of tiles.
    #[error("row {row} holds {actual} tiles, expected {expected}")]
    RowLengthMismatch {
        /// Index of the offending row.
        row: usize,
        /// Declared column count.
        expected: u32,
        /// Number of tiles in the row.
        actual: usize,
    },
    /// A persisted identifier did not name any tile kind.
    #[error("unknown tile id {id} at column {column}, row {row}")]
    UnknownTileId {
        /// Column of the offending tile.
        column: usize,
        /// Row of the offending tile.
        row: usize,
        /// Identifier that failed to resolve.
        id: u8,
    },
}

/// Immutable rectangular layout of terrain tiles.
///
/// Every coordinate inside `columns x rows` holds exactly one [`TileKind`].
/// Lookups outside the grid report `None` rather than inventing a tile. The
/// impassable classification is resolved once per tile at construction so the
/// collision path only reads a flat boolean buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_length: f32,
    tiles: Vec<TileKind>,
    blocked: Vec<bool>,
    passability: Passability,
}

impl TileGrid {
    /// Creates a grid where every tile holds the same kind.
    pub fn filled(
        columns: u32,
        rows: u32,
        tile_length: f32,
        kind: TileKind,
    ) -> Result<Self, GridError> {
        let count = checked_tile_count(columns, rows)?;
        Self::from_tiles(columns, rows, tile_length, vec![kind; count])
    }

    /// Creates a grid from a row-major tile buffer using the canonical passability.
    pub fn from_tiles(
        columns: u32,
        rows: u32,
        tile_length: f32,
        tiles: Vec<TileKind>,
    ) -> Result<Self, GridError> {
        let expected = checked_tile_count(columns, rows)?;
        if !(tile_length.is_finite() && tile_length > 0.0) {
            return Err(GridError::InvalidTileLength(tile_length));
        }
        if tiles.len() != expected {
            return Err(GridError::TileCountMismatch {
                expected,
                actual: tiles.len(),
            });
        }

        let passability = Passability::default();
        let blocked = classify(&tiles, passability);
        Ok(Self {
            columns,
            rows,
            tile_length,
            tiles,
            blocked,
            passability,
        })
    }

    /// Reconstructs a grid from persisted tile identifiers.
    ///
    /// The outer slice holds rows, each inner vector holds one identifier per
    /// column. Any shape mismatch or unknown identifier fails the whole
    /// reconstruction.
    pub fn from_ids(
        columns: u32,
        rows: u32,
        tile_length: f32,
        ids: &[Vec<u8>],
    ) -> Result<Self, GridError> {
        let expected = checked_tile_count(columns, rows)?;
        if ids.len() != rows as usize {
            return Err(GridError::RowCountMismatch {
                expected: rows,
                actual: ids.len(),
            });
        }

        let mut tiles = Vec::with_capacity(expected);
        for (row, row_ids) in ids.iter().enumerate() {
            if row_ids.len() != columns as usize {
                return Err(GridError::RowLengthMismatch {
                    row,
                    expected: columns,
                    actual: row_ids.len(),
                });
            }
            for (column, id) in row_ids.iter().copied().enumerate() {
                let kind =
                    TileKind::from_id(id).ok_or(GridError::UnknownTileId { column, row, id })?;
                tiles.push(kind);
            }
        }

        Self::from_tiles(columns, rows, tile_length, tiles)
    }

    /// Replaces the impassable set and refreshes the cached classification.
    #[must_use]
    pub fn with_passability(mut self, passability: Passability) -> Self {
        self.blocked = classify(&self.tiles, passability);
        self.passability = passability;
        self
    }

    /// Exports the grid as rows of persisted tile identifiers.
    #[must_use]
    pub fn to_ids(&self) -> Vec<Vec<u8>> {
        self.tiles
            .chunks(self.columns as usize)
            .map(|row| row.iter().map(|kind| kind.id()).collect())
            .collect()
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Impassable set used to build the cached classification.
    #[must_use]
    pub const fn passability(&self) -> Passability {
        self.passability
    }

    /// Row-major view over every tile.
    #[must_use]
    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// Returns the tile stored at the coordinate, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, coord: TileCoord) -> Option<TileKind> {
        self.index(coord).map(|index| self.tiles[index])
    }

    /// Returns the tile under a world-space point, or `None` outside the grid.
    #[must_use]
    pub fn tile_at_world(&self, point: WorldPoint) -> Option<TileKind> {
        self.coord_at_world(point).and_then(|coord| self.tile(coord))
    }

    /// Converts a world-space point into the coordinate of the tile beneath it.
    #[must_use]
    pub fn coord_at_world(&self, point: WorldPoint) -> Option<TileCoord> {
        if !(point.x.is_finite() && point.y.is_finite()) || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let column = (point.x / self.tile_length).floor();
        let row = (point.y / self.tile_length).floor();
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }
        Some(TileCoord::new(column as u32, row as u32))
    }

    /// Reports whether the tile blocks movement, or `None` outside the grid.
    #[must_use]
    pub fn is_impassable(&self, coord: TileCoord) -> Option<bool> {
        self.index(coord).map(|index| self.blocked[index])
    }

    /// Iterates over every tile together with its coordinate in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, TileKind)> + '_ {
        let columns = self.columns;
        self.tiles.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (TileCoord::new(index % columns, index / columns), *kind)
        })
    }

    /// Counts the tiles of the provided kind.
    #[must_use]
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| **tile == kind).count()
    }

    /// World-space rectangle covered by a tile.
    #[must_use]
    pub fn tile_bounds(&self, coord: TileCoord) -> WorldRect {
        WorldRect::new(
            WorldPoint::new(
                coord.column() as f32 * self.tile_length,
                coord.row() as f32 * self.tile_length,
            ),
            self.tile_length,
            self.tile_length,
        )
    }

    /// Computes every tile intersected by the rectangle.
    ///
    /// Returns `None` when the rectangle is empty, not finite, or reaches
    /// outside `[0, width) x [0, height)`; callers treat that as blocked.
    #[must_use]
    pub fn covering_span(&self, rect: &WorldRect) -> Option<TileSpan> {
        let (first_column, last_column) =
            axis_span(rect.left(), rect.right(), self.tile_length, self.columns)?;
        let (first_row, last_row) =
            axis_span(rect.top(), rect.bottom(), self.tile_length, self.rows)?;
        Some(TileSpan {
            first_column,
            last_column,
            first_row,
            last_row,
        })
    }

    /// Reports whether the rectangle lies inside the map and touches no impassable tile.
    #[must_use]
    pub fn is_region_clear(&self, rect: &WorldRect) -> bool {
        self.covering_span(rect).map_or(false, |span| {
            span.coords()
                .all(|coord| self.is_impassable(coord) == Some(false))
        })
    }

    /// Enumerates the top-left corners of every walkable tile.
    #[must_use]
    pub fn walkable_positions(&self) -> Vec<WorldPoint> {
        self.iter()
            .filter(|(coord, _)| self.is_impassable(*coord) == Some(false))
            .map(|(coord, _)| self.tile_bounds(coord).origin())
            .collect()
    }

    /// Lists the tiles intersecting a world rectangle, clipped to the grid.
    pub fn tiles_in_rect(&self, rect: &WorldRect) -> impl Iterator<Item = TileSample> + '_ {
        let span = self.clipped_span(rect);
        span.into_iter()
            .flat_map(|span| span.coords().collect::<Vec<_>>())
            .filter_map(move |coord| {
                self.tile(coord).map(|kind| TileSample {
                    coord,
                    kind,
                    bounds: self.tile_bounds(coord),
                })
            })
    }

    fn clipped_span(&self, rect: &WorldRect) -> Option<TileSpan> {
        let bounds = WorldRect::new(WorldPoint::default(), self.width(), self.height());
        if !rect.intersects(&bounds) {
            return None;
        }
        let left = rect.left().max(0.0);
        let top = rect.top().max(0.0);
        let right = rect.right().min(self.width());
        let bottom = rect.bottom().min(self.height());
        self.covering_span(&WorldRect::new(
            WorldPoint::new(left, top),
            right - left,
            bottom - top,
        ))
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        if coord.column() < self.columns && coord.row() < self.rows {
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

fn checked_tile_count(columns: u32, rows: u32) -> Result<usize, GridError> {
    if columns == 0 || rows == 0 {
        return Err(GridError::InvalidDimension { columns, rows });
    }
    let count = u64::from(columns) * u64::from(rows);
    usize::try_from(count).map_err(|_| GridError::InvalidDimension { columns, rows })
}

fn classify(tiles: &[TileKind], passability: Passability) -> Vec<bool> {
    tiles
        .iter()
        .map(|kind| passability.is_impassable(*kind))
        .collect()
}

fn axis_span(start: f32, end: f32, tile_length: f32, count: u32) -> Option<(u32, u32)> {
    if !(start.is_finite() && end.is_finite()) || start < 0.0 || end <= start {
        return None;
    }
    let first = (start / tile_length).floor();
    let last = (end / tile_length).ceil() - 1.0;
    if last >= count as f32 {
        return None;
    }
    Some((first as u32, last.max(first) as u32))
}
