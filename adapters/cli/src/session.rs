use std::time::Duration;

use log::debug;
use wildlands_core::Command;
use wildlands_rendering::{Camera, FrameInput, Scene};
use wildlands_system_movement::MovementIntent;
use wildlands_world::{self as world, query, World};

/// Live game: the authoritative world and the camera following its actor.
pub(crate) struct Session {
    pub(crate) world: World,
    camera: Camera,
}

impl Session {
    pub(crate) fn new(world: World, camera: Camera) -> Self {
        let mut session = Self { world, camera };
        session.follow_actor();
        session
    }

    /// Applies one frame of input: zoom, movement, then camera follow.
    pub(crate) fn advance(&mut self, dt: Duration, input: FrameInput) {
        if input.zoom_steps != 0 {
            let zoom = self.camera.apply_zoom_steps(input.zoom_steps);
            debug!("camera zoom is now {zoom}");
        }

        let intent = MovementIntent::new(input.horizontal, input.vertical, input.sprint);
        let velocity = intent.velocity(query::movement_config(&self.world));
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::MoveActor { velocity, dt },
            &mut events,
        );
        for event in &events {
            debug!("{event:?}");
        }
        self.follow_actor();
    }

    /// Projects the part of the world under the camera.
    pub(crate) fn scene(&self) -> Scene {
        Scene::capture(
            self.camera,
            query::tiles_in_view(&self.world, &self.camera.visible_rect()),
            query::actor(&self.world),
        )
    }

    fn follow_actor(&mut self) {
        if let (Some(actor), Some(grid)) = (query::actor(&self.world), query::tile_grid(&self.world))
        {
            self.camera
                .follow(actor.center(), grid.width(), grid.height());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildlands_core::{TileGrid, TileKind, WorldPoint};
    use wildlands_rendering::CameraConfig;

    fn session() -> Session {
        let mut world = World::new();
        let grid = TileGrid::filled(100, 100, 64.0, TileKind::Grass).expect("valid grid");
        let mut events = Vec::new();
        world::apply(&mut world, Command::InstallTerrain { grid }, &mut events);
        world::apply(
            &mut world,
            Command::SpawnActor {
                position: WorldPoint::new(1_280.0, 1_280.0),
            },
            &mut events,
        );
        let camera = Camera::new(&CameraConfig::default()).expect("valid camera");
        Session::new(world, camera)
    }

    #[test]
    fn camera_starts_centred_on_the_actor() {
        let session = session();
        let actor = session.scene().actor.expect("actor visible");
        assert_eq!(actor.origin.x + actor.size / 2.0, 640.0);
        assert_eq!(actor.origin.y + actor.size / 2.0, 360.0);
    }

    #[test]
    fn advancing_moves_the_actor_and_keeps_it_centred() {
        let mut session = session();
        session.advance(
            Duration::from_millis(500),
            FrameInput {
                horizontal: 1,
                ..FrameInput::default()
            },
        );
        assert_eq!(
            query::actor_position(&session.world),
            Some(WorldPoint::new(1_380.0, 1_280.0))
        );
        let actor = session.scene().actor.expect("actor visible");
        assert_eq!(actor.origin.x + actor.size / 2.0, 640.0);
    }

    #[test]
    fn zoom_input_changes_the_visible_area() {
        let mut session = session();
        let before = session.scene().tiles.len();
        session.advance(
            Duration::ZERO,
            FrameInput {
                zoom_steps: 2,
                ..FrameInput::default()
            },
        );
        assert!(session.scene().tiles.len() < before);
    }
}
