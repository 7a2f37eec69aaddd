#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Wildlands.

use log::debug;
use wildlands_core::{ActorBox, Command, Event, SpawnError, TileGrid, WorldPoint, WELCOME_BANNER};
use wildlands_system_movement::{MovementConfig, MovementResolver};

/// Represents the authoritative Wildlands world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    movement: MovementConfig,
    resolver: MovementResolver,
    terrain: Option<TileGrid>,
    actor: Option<ActorBox>,
}

impl World {
    /// Creates an empty world using the default movement tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_movement(MovementConfig::default())
    }

    /// Creates an empty world using the provided movement tuning.
    #[must_use]
    pub fn with_movement(movement: MovementConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            resolver: MovementResolver::from_config(&movement),
            movement,
            terrain: None,
            actor: None,
        }
    }

    fn place_actor(&self, position: WorldPoint) -> Result<ActorBox, SpawnError> {
        let grid = self.terrain.as_ref().ok_or(SpawnError::MissingTerrain)?;
        let actor = ActorBox::new(position, self.movement.actor_size);
        let rect = actor.rect();
        if grid.covering_span(&rect).is_none() {
            return Err(SpawnError::OutOfBounds);
        }
        if !grid.is_region_clear(&rect) {
            return Err(SpawnError::Blocked);
        }
        Ok(actor)
    }

    fn remove_actor(&mut self, out_events: &mut Vec<Event>) {
        if self.actor.take().is_some() {
            out_events.push(Event::ActorDespawned);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::InstallTerrain { grid } => {
            world.remove_actor(out_events);
            let (columns, rows) = (grid.columns(), grid.rows());
            debug!("installing {columns}x{rows} terrain");
            world.terrain = Some(grid);
            out_events.push(Event::TerrainInstalled { columns, rows });
        }
        Command::ClearTerrain => {
            world.remove_actor(out_events);
            if world.terrain.take().is_some() {
                out_events.push(Event::TerrainCleared);
            }
        }
        Command::SpawnActor { position } => match world.place_actor(position) {
            Ok(actor) => {
                world.actor = Some(actor);
                out_events.push(Event::ActorSpawned { position });
            }
            Err(reason) => {
                debug!("rejected spawn at ({}, {}): {reason}", position.x, position.y);
                out_events.push(Event::SpawnRejected { position, reason });
            }
        },
        Command::MoveActor { velocity, dt } => {
            let (Some(grid), Some(actor)) = (world.terrain.as_ref(), world.actor) else {
                return;
            };
            let moved = world.resolver.step(actor, velocity, dt, grid);
            if moved.origin() != actor.origin() {
                world.actor = Some(moved);
                out_events.push(Event::ActorMoved {
                    from: actor.origin(),
                    to: moved.origin(),
                });
            }
        }
        Command::DespawnActor => world.remove_actor(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use wildlands_core::{ActorBox, TileGrid, TileSample, WorldPoint, WorldRect};
    use wildlands_system_movement::MovementConfig;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the installed terrain, if any.
    #[must_use]
    pub fn tile_grid(world: &World) -> Option<&TileGrid> {
        world.terrain.as_ref()
    }

    /// Movement tuning the world resolves actor motion with.
    #[must_use]
    pub fn movement_config(world: &World) -> &MovementConfig {
        &world.movement
    }

    /// Bounding box of the actor, if one has been spawned.
    #[must_use]
    pub fn actor(world: &World) -> Option<ActorBox> {
        world.actor
    }

    /// Top-left corner of the actor, if one has been spawned.
    #[must_use]
    pub fn actor_position(world: &World) -> Option<WorldPoint> {
        world.actor.map(|actor| actor.origin())
    }

    /// Lists the tiles intersecting the provided view rectangle.
    ///
    /// Areas of the view beyond the map contribute no tiles.
    #[must_use]
    pub fn tiles_in_view(world: &World, view: &WorldRect) -> Vec<TileSample> {
        world
            .terrain
            .as_ref()
            .map(|grid| grid.tiles_in_rect(view).collect())
            .unwrap_or_default()
    }

    /// Enumerates the top-left corners of every walkable tile.
    #[must_use]
    pub fn walkable_positions(world: &World) -> Vec<WorldPoint> {
        world
            .terrain
            .as_ref()
            .map(TileGrid::walkable_positions)
            .unwrap_or_default()
    }
}
