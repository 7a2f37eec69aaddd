use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wildlands_core::{Command, Event, TileGrid, TileKind, WorldPoint};
use wildlands_system_movement::{CollisionPolicy, MovementConfig, MovementIntent};
use wildlands_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn deterministic_replay_produces_identical_event_logs() {
    for policy in [CollisionPolicy::Rollback, CollisionPolicy::SnapToEdge] {
        let first = replay(policy, 7);
        let second = replay(policy, 7);

        assert_eq!(first, second, "{policy:?} replay diverged between runs");
        assert!(
            first
                .events
                .iter()
                .any(|event| matches!(event, Event::ActorMoved { .. })),
            "{policy:?} replay never moved the actor"
        );
    }
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    final_position: Option<WorldPoint>,
}

fn replay(policy: CollisionPolicy, seed: u64) -> ReplayOutcome {
    let mut world = World::with_movement(MovementConfig {
        policy,
        ..MovementConfig::default()
    });
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::InstallTerrain {
            grid: walled_garden(),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnActor {
            position: WorldPoint::new(64.0, 64.0),
        },
        &mut events,
    );

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..600 {
        let intent = MovementIntent::new(
            rng.gen_range(-1..=1),
            rng.gen_range(-1..=1),
            rng.gen_bool(0.25),
        );
        let velocity = intent.velocity(query::movement_config(&world));
        world::apply(&mut world, Command::MoveActor { velocity, dt: FRAME }, &mut events);

        let actor = query::actor(&world).expect("actor stays spawned");
        let grid = query::tile_grid(&world).expect("terrain stays installed");
        assert!(
            grid.is_region_clear(&actor.rect()),
            "{policy:?} let the actor overlap a blocked tile at {actor:?}"
        );
    }

    ReplayOutcome {
        events,
        final_position: query::actor_position(&world),
    }
}

/// Open 12x10 field bordered by water with a few obstacles inside.
fn walled_garden() -> TileGrid {
    let columns = 12;
    let rows = 10;
    let mut tiles = Vec::with_capacity((columns * rows) as usize);
    for row in 0..rows {
        for column in 0..columns {
            let border = row == 0 || column == 0 || row == rows - 1 || column == columns - 1;
            let kind = match (column, row) {
                _ if border => TileKind::Water,
                (4, 2..=6) => TileKind::Mountain,
                (8, 3) => TileKind::TreeObstacle,
                (7, 7) => TileKind::RockObstacle,
                _ => TileKind::Grass,
            };
            tiles.push(kind);
        }
    }
    TileGrid::from_tiles(columns, rows, 64.0, tiles).expect("valid grid")
}
