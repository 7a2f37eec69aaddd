#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Save-game documents and the numbered slot store that keeps them on disk.
//!
//! Each slot is a pretty-printed JSON file named `save_slot_{n}.json` holding
//! the save name, the actor's top-left corner and the terrain as rows of tile
//! identifiers. Loading rebuilds the grid through
//! [`TileGrid::from_ids`], so a damaged file surfaces as an error instead of a
//! silently patched map.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wildlands_core::{GridError, Passability, TileGrid, WorldPoint};

/// Number of save slots, numbered from 1.
pub const SLOT_COUNT: u8 = 10;

/// Errors raised while reading or writing save games.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Slot numbers run from 1 to [`SLOT_COUNT`].
    #[error("slot {slot} does not exist; slots run from 1 to {}", SLOT_COUNT)]
    SlotOutOfRange {
        /// Requested slot.
        slot: u8,
    },
    /// The slot holds no save file.
    #[error("slot {slot} is empty")]
    MissingSlot {
        /// Requested slot.
        slot: u8,
    },
    /// Every slot already holds a save.
    #[error("all {} save slots are in use", SLOT_COUNT)]
    NoFreeSlot,
    /// Save names must contain a visible character.
    #[error("save name must not be blank")]
    BlankName,
    /// Reading or writing the slot file failed.
    #[error("failed to access {}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// The slot file is not a valid save document.
    #[error("{} is not a valid save file", .path.display())]
    Json {
        /// File being decoded.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
    /// The saved terrain could not be rebuilt.
    #[error("saved terrain is corrupt")]
    CorruptGrid(#[from] GridError),
}

/// Persisted form of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    /// Player-facing name of the save.
    #[serde(default)]
    pub save_name: String,
    /// Horizontal coordinate of the actor's top-left corner.
    pub player_x: f32,
    /// Vertical coordinate of the actor's top-left corner.
    pub player_y: f32,
    /// Row count; inferred from `map_data` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    /// Column count; inferred from the first row of `map_data` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    /// Tile identifiers, one inner vector per row.
    pub map_data: Vec<Vec<u8>>,
}

impl SaveGame {
    /// Captures the terrain and the actor position under the provided name.
    #[must_use]
    pub fn capture(save_name: impl Into<String>, grid: &TileGrid, position: WorldPoint) -> Self {
        Self {
            save_name: save_name.into(),
            player_x: position.x,
            player_y: position.y,
            rows: Some(grid.rows()),
            columns: Some(grid.columns()),
            map_data: grid.to_ids(),
        }
    }

    /// Saved actor position.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        WorldPoint::new(self.player_x, self.player_y)
    }

    /// Rebuilds the saved terrain.
    ///
    /// Any shape mismatch or unknown tile identifier fails the whole restore.
    pub fn restore_grid(
        &self,
        tile_length: f32,
        passability: Passability,
    ) -> Result<TileGrid, PersistenceError> {
        let rows = self
            .rows
            .unwrap_or_else(|| dimension(self.map_data.len()));
        let columns = self
            .columns
            .unwrap_or_else(|| dimension(self.map_data.first().map_or(0, Vec::len)));
        let grid = TileGrid::from_ids(columns, rows, tile_length, &self.map_data)?;
        Ok(grid.with_passability(passability))
    }
}

fn dimension(length: usize) -> u32 {
    u32::try_from(length).unwrap_or(u32::MAX)
}

/// Contents of a slot as shown in a slot picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    /// No save file exists.
    Empty,
    /// A readable save with its display name.
    Saved(String),
    /// A save file exists but cannot be decoded.
    Corrupted,
}

/// Summary of one slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotSummary {
    /// Slot number, starting at 1.
    pub slot: u8,
    /// What the slot holds.
    pub status: SlotStatus,
}

/// Directory holding the numbered save slots.
#[derive(Clone, Debug)]
pub struct SlotStore {
    directory: PathBuf,
}

impl SlotStore {
    /// Creates a store rooted at `directory`; nothing is touched until a save.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Directory holding the slot files.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Location of a slot's file.
    pub fn slot_path(&self, slot: u8) -> Result<PathBuf, PersistenceError> {
        if !(1..=SLOT_COUNT).contains(&slot) {
            return Err(PersistenceError::SlotOutOfRange { slot });
        }
        Ok(self.directory.join(format!("save_slot_{slot}.json")))
    }

    /// Writes the save into a slot, replacing whatever the slot held.
    pub fn save(&self, slot: u8, game: &SaveGame) -> Result<PathBuf, PersistenceError> {
        if game.save_name.trim().is_empty() {
            return Err(PersistenceError::BlankName);
        }
        let path = self.slot_path(slot)?;
        fs::create_dir_all(&self.directory).map_err(|source| PersistenceError::Io {
            path: self.directory.clone(),
            source,
        })?;
        write_document(&path, game)?;
        info!("saved '{}' to slot {slot}", game.save_name);
        Ok(path)
    }

    /// Writes the save into the lowest-numbered empty slot and returns that slot.
    pub fn save_to_first_empty(&self, game: &SaveGame) -> Result<u8, PersistenceError> {
        let slot = self.first_empty()?.ok_or(PersistenceError::NoFreeSlot)?;
        let _ = self.save(slot, game)?;
        Ok(slot)
    }

    /// Reads the save stored in a slot.
    pub fn load(&self, slot: u8) -> Result<SaveGame, PersistenceError> {
        let game = self.read_slot(slot)?;
        info!("loaded '{}' from slot {slot}", game.save_name);
        Ok(game)
    }

    /// Summarises every slot in order.
    pub fn list(&self) -> Result<Vec<SlotSummary>, PersistenceError> {
        (1..=SLOT_COUNT)
            .map(|slot| {
                let status = match self.read_slot(slot) {
                    Ok(game) if game.save_name.trim().is_empty() => {
                        SlotStatus::Saved(format!("Unnamed Save {slot}"))
                    }
                    Ok(game) => SlotStatus::Saved(game.save_name),
                    Err(PersistenceError::MissingSlot { .. }) => SlotStatus::Empty,
                    Err(PersistenceError::Json { path, source }) => {
                        warn!("slot {slot} at {} is corrupted: {source}", path.display());
                        SlotStatus::Corrupted
                    }
                    Err(error) => return Err(error),
                };
                Ok(SlotSummary { slot, status })
            })
            .collect()
    }

    /// Lowest-numbered slot without a save file.
    pub fn first_empty(&self) -> Result<Option<u8>, PersistenceError> {
        for slot in 1..=SLOT_COUNT {
            if !self.slot_path(slot)?.exists() {
                return Ok(Some(slot));
            }
        }
        Ok(None)
    }

    /// Changes the name of the save held in a slot.
    pub fn rename(&self, slot: u8, new_name: &str) -> Result<(), PersistenceError> {
        if new_name.trim().is_empty() {
            return Err(PersistenceError::BlankName);
        }
        let mut game = self.read_slot(slot)?;
        let previous = std::mem::replace(&mut game.save_name, new_name.to_owned());
        write_document(&self.slot_path(slot)?, &game)?;
        info!("renamed slot {slot} from '{previous}' to '{new_name}'");
        Ok(())
    }

    fn read_slot(&self, slot: u8) -> Result<SaveGame, PersistenceError> {
        let path = self.slot_path(slot)?;
        read_document(&path).map_err(|error| match error {
            PersistenceError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                PersistenceError::MissingSlot { slot }
            }
            other => other,
        })
    }
}

fn read_document(path: &Path) -> Result<SaveGame, PersistenceError> {
    let contents = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_document(path: &Path, game: &SaveGame) -> Result<(), PersistenceError> {
    let contents = serde_json::to_string_pretty(game).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, contents).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildlands_core::TileKind;

    #[test]
    fn slot_numbers_are_bounded() {
        let store = SlotStore::new("saves");
        assert!(matches!(
            store.slot_path(0),
            Err(PersistenceError::SlotOutOfRange { slot: 0 })
        ));
        assert!(matches!(
            store.slot_path(11),
            Err(PersistenceError::SlotOutOfRange { slot: 11 })
        ));
        assert_eq!(
            store.slot_path(3).expect("valid slot"),
            Path::new("saves").join("save_slot_3.json")
        );
    }

    #[test]
    fn legacy_documents_infer_their_shape() {
        let json = r#"{
            "player_x": 64,
            "player_y": 128,
            "map_data": [[1, 2, 3], [0, 4, 5]],
            "save_name": "Old"
        }"#;
        let game: SaveGame = serde_json::from_str(json).expect("valid document");
        let grid = game
            .restore_grid(64.0, Passability::default())
            .expect("valid grid");
        assert_eq!((grid.columns(), grid.rows()), (3, 2));
        assert_eq!(
            grid.tile(wildlands_core::TileCoord::new(1, 1)),
            Some(TileKind::TreeObstacle)
        );
        assert_eq!(game.position(), WorldPoint::new(64.0, 128.0));
    }

    #[test]
    fn unknown_tile_ids_fail_the_restore() {
        let game = SaveGame {
            save_name: "Broken".to_owned(),
            player_x: 0.0,
            player_y: 0.0,
            rows: None,
            columns: None,
            map_data: vec![vec![1, 9]],
        };
        assert!(matches!(
            game.restore_grid(64.0, Passability::default()),
            Err(PersistenceError::CorruptGrid(GridError::UnknownTileId { id: 9, .. }))
        ));
    }

    #[test]
    fn empty_map_data_is_corrupt() {
        let game = SaveGame {
            save_name: "Empty".to_owned(),
            player_x: 0.0,
            player_y: 0.0,
            rows: None,
            columns: None,
            map_data: Vec::new(),
        };
        assert!(matches!(
            game.restore_grid(64.0, Passability::default()),
            Err(PersistenceError::CorruptGrid(GridError::InvalidDimension { .. }))
        ));
    }
}
