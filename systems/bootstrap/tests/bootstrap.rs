use std::time::Duration;

use wildlands_core::{Command, Event, SpawnError, TileGrid, TileKind, WorldPoint, WELCOME_BANNER};
use wildlands_system_bootstrap::Bootstrap;
use wildlands_system_movement::{MovementConfig, MovementIntent};
use wildlands_system_spawning::SpawnConfig;
use wildlands_system_terrain::{TerrainConfig, TerrainError};
use wildlands_world::{self as world, query, World};

#[test]
fn banner_comes_from_the_world() {
    let world = World::new();
    let bootstrap = Bootstrap::default();
    assert_eq!(bootstrap.welcome_banner(&world), WELCOME_BANNER);
}

#[test]
fn new_game_installs_terrain_and_spawns_on_walkable_ground() {
    let mut world = World::new();
    let mut bootstrap = Bootstrap::default();

    let events = bootstrap
        .new_game(&mut world, 60, 40, 31_337)
        .expect("generated");

    assert_eq!(
        events.first(),
        Some(&Event::TerrainInstalled {
            columns: 60,
            rows: 40
        })
    );
    assert!(matches!(events.last(), Some(Event::ActorSpawned { .. })));

    let grid = query::tile_grid(&world).expect("terrain installed");
    let actor = query::actor(&world).expect("actor spawned");
    assert!(grid.is_region_clear(&actor.rect()));
}

#[test]
fn new_game_is_reproducible() {
    let run = || {
        let mut world = World::new();
        let mut bootstrap = Bootstrap::new(TerrainConfig::default(), SpawnConfig::default());
        let _ = bootstrap
            .new_game(&mut world, 50, 50, 8)
            .expect("generated");
        (
            query::tile_grid(&world).cloned(),
            query::actor_position(&world),
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn new_game_surfaces_invalid_dimensions() {
    let mut world = World::new();
    let mut bootstrap = Bootstrap::default();
    assert!(matches!(
        bootstrap.new_game(&mut world, 0, 0, 1),
        Err(TerrainError::InvalidDimension { .. })
    ));
    assert!(query::tile_grid(&world).is_none());
}

#[test]
fn impassable_map_spawns_at_fallback_and_is_rejected() {
    let mut world = World::new();
    let fallback = WorldPoint::new(640.0, 360.0);
    let mut bootstrap = Bootstrap::new(TerrainConfig::default(), SpawnConfig::new(1, fallback));
    let grid = TileGrid::filled(20, 20, 64.0, TileKind::Mountain).expect("valid grid");

    let events = bootstrap.start(&mut world, grid);

    assert_eq!(
        events.last(),
        Some(&Event::SpawnRejected {
            position: fallback,
            reason: SpawnError::Blocked
        })
    );
    assert!(query::actor(&world).is_none());
}

#[test]
fn actor_larger_than_the_map_falls_back_out_of_bounds() {
    let mut world = World::with_movement(MovementConfig {
        actor_size: 2_000.0,
        ..MovementConfig::default()
    });
    let fallback = WorldPoint::new(640.0, 360.0);
    let mut bootstrap = Bootstrap::new(TerrainConfig::default(), SpawnConfig::new(1, fallback));
    let grid = TileGrid::filled(20, 20, 64.0, TileKind::Grass).expect("valid grid");

    let events = bootstrap.start(&mut world, grid);

    assert_eq!(
        events.last(),
        Some(&Event::SpawnRejected {
            position: fallback,
            reason: SpawnError::OutOfBounds
        })
    );
}

#[test]
fn resume_restores_the_saved_position() {
    let mut world = World::new();
    let bootstrap = Bootstrap::default();
    let grid = TileGrid::filled(10, 10, 64.0, TileKind::Dirt).expect("valid grid");
    let saved = WorldPoint::new(130.5, 260.25);

    let events = bootstrap.resume(&mut world, grid, saved);

    assert_eq!(events.last(), Some(&Event::ActorSpawned { position: saved }));
    assert_eq!(query::actor_position(&world), Some(saved));
}

#[test]
fn session_can_be_played_and_torn_down() {
    let mut world = World::new();
    let mut bootstrap = Bootstrap::default();
    let grid = TileGrid::filled(10, 10, 64.0, TileKind::Grass).expect("valid grid");
    let _ = bootstrap.resume(&mut world, grid, WorldPoint::new(64.0, 64.0));

    let velocity = MovementIntent::new(1, 1, true).velocity(query::movement_config(&world));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::MoveActor {
            velocity,
            dt: Duration::from_millis(100),
        },
        &mut events,
    );
    assert!(matches!(events.as_slice(), [Event::ActorMoved { .. }]));

    let events = bootstrap.return_to_menu(&mut world);
    assert_eq!(events, vec![Event::ActorDespawned, Event::TerrainCleared]);
    assert!(query::tile_grid(&world).is_none());
}
