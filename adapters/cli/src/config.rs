use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wildlands_rendering::CameraConfig;
use wildlands_system_movement::MovementConfig;
use wildlands_system_spawning::SpawnConfig;
use wildlands_system_terrain::TerrainConfig;

/// Dimensions of freshly generated maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct MapConfig {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            columns: 150,
            rows: 150,
        }
    }
}

/// Every tunable of a session, loadable from a TOML file.
///
/// Missing tables and keys keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GameConfig {
    pub(crate) map: MapConfig,
    pub(crate) terrain: TerrainConfig,
    pub(crate) movement: MovementConfig,
    pub(crate) spawn: SpawnConfig,
    pub(crate) camera: CameraConfig,
}

impl GameConfig {
    /// Reads the configuration file, or returns the defaults when none is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid configuration toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildlands_core::{Passability, TileKind, WorldPoint};
    use wildlands_system_movement::CollisionPolicy;

    #[test]
    fn empty_file_yields_defaults() {
        let config = GameConfig::parse("").expect("empty config is valid");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.map.columns, 150);
        assert_eq!(config.terrain.tile_length, 64.0);
        assert_eq!(config.camera.initial_zoom, 0.5);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = GameConfig::parse(
            r#"
            [map]
            columns = 40

            [terrain]
            dirt_chance = 0.1
            passability = ["Water", "Mountain"]

            [terrain.water]
            density = 0.01
            radius_min = 2
            radius_max = 4
            threshold = 0.5

            [movement]
            policy = "SnapToEdge"
            speed = 150.0

            [spawn]
            rng_seed = 9
            fallback = { x = 32.0, y = 48.0 }
            "#,
        )
        .expect("valid config");

        assert_eq!(config.map.columns, 40);
        assert_eq!(config.map.rows, 150);
        assert_eq!(config.terrain.dirt_chance, 0.1);
        assert_eq!(
            config.terrain.passability,
            Passability::from_impassable([TileKind::Water, TileKind::Mountain])
        );
        assert_eq!(config.terrain.water.radius_max, 4);
        assert_eq!(config.terrain.mountains.radius_max, 12);
        assert_eq!(config.movement.policy, CollisionPolicy::SnapToEdge);
        assert_eq!(config.movement.speed, 150.0);
        assert_eq!(config.movement.actor_size, 64.0);
        assert_eq!(config.spawn.rng_seed, 9);
        assert_eq!(config.spawn.fallback, WorldPoint::new(32.0, 48.0));
    }

    #[test]
    fn malformed_files_are_rejected() {
        assert!(GameConfig::parse("[movement]\npolicy = \"Teleport\"").is_err());
        assert!(GameConfig::load(Some(Path::new("/nonexistent/wildlands.toml"))).is_err());
    }

    #[test]
    fn defaults_survive_a_toml_round_trip() {
        let text = toml::to_string(&GameConfig::default()).expect("serializable");
        assert_eq!(GameConfig::parse(&text).expect("parsable"), GameConfig::default());
    }
}
