//! Terminal rendering backend that replays scripted input and prints the final frame.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use glam::Vec2;
use wildlands_core::TileKind;
use wildlands_rendering::{FrameInput, Presentation, RenderingBackend, Scene};

/// Screen pixels covered by one character cell.
pub(crate) const CELL_PIXELS: f32 = 16.0;

const ACTOR_GLYPH: char = '@';

/// Character used to draw a tile kind.
pub(crate) const fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Water => '~',
        TileKind::Grass => '.',
        TileKind::Dirt => ':',
        TileKind::Mountain => '^',
        TileKind::TreeObstacle => 'T',
        TileKind::RockObstacle => 'o',
    }
}

/// Backend that feeds a fixed list of frame inputs and writes the last frame as text.
pub(crate) struct AsciiBackend<W> {
    frames: Vec<FrameInput>,
    frame_time: Duration,
    output: W,
}

impl<W: Write> AsciiBackend<W> {
    pub(crate) fn new(frames: Vec<FrameInput>, frame_time: Duration, output: W) -> Self {
        Self {
            frames,
            frame_time,
            output,
        }
    }
}

impl<W: Write> RenderingBackend for AsciiBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            mut scene,
            ..
        } = presentation;
        for input in self.frames {
            update_scene(self.frame_time, input, &mut scene);
        }

        writeln!(self.output, "{window_title}").context("failed to write frame header")?;
        self.output
            .write_all(draw(&scene).as_bytes())
            .context("failed to write frame")?;
        self.output.flush().context("failed to flush frame")
    }
}

/// Rasterises the scene into rows of characters covering the camera viewport.
pub(crate) fn draw(scene: &Scene) -> String {
    let viewport = scene.camera.viewport();
    let columns = (viewport.x / CELL_PIXELS).ceil().max(1.0) as usize;
    let rows = (viewport.y / CELL_PIXELS).ceil().max(1.0) as usize;
    let mut canvas = vec![vec![' '; columns]; rows];

    for tile in &scene.tiles {
        fill(&mut canvas, tile.origin, tile.size, glyph(tile.kind));
    }
    if let Some(actor) = &scene.actor {
        fill(&mut canvas, actor.origin, actor.size, ACTOR_GLYPH);
    }

    let mut text = String::with_capacity(rows * (columns + 1));
    for row in canvas {
        text.extend(row);
        text.push('\n');
    }
    text
}

fn fill(canvas: &mut [Vec<char>], origin: Vec2, size: f32, glyph: char) {
    let Some(columns) = cell_range(origin.x, size, canvas.first().map_or(0, Vec::len)) else {
        return;
    };
    let Some(rows) = cell_range(origin.y, size, canvas.len()) else {
        return;
    };
    for row in &mut canvas[rows] {
        for cell in &mut row[columns.clone()] {
            *cell = glyph;
        }
    }
}

fn cell_range(start: f32, size: f32, cells: usize) -> Option<std::ops::Range<usize>> {
    let first = (start / CELL_PIXELS).floor().max(0.0);
    let end = ((start + size) / CELL_PIXELS).ceil().min(cells as f32);
    if !(first.is_finite() && end.is_finite()) || end <= first {
        return None;
    }
    Some(first as usize..end as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildlands_core::{ActorBox, TileCoord, TileSample, WorldPoint, WorldRect};
    use wildlands_rendering::{Camera, CameraConfig, CLEAR_COLOR};

    fn camera() -> Camera {
        Camera::new(&CameraConfig {
            viewport_width: 64.0,
            viewport_height: 32.0,
            initial_zoom: 1.0,
            ..CameraConfig::default()
        })
        .expect("valid camera")
    }

    fn sample(column: u32, row: u32, kind: TileKind) -> TileSample {
        TileSample {
            coord: TileCoord::new(column, row),
            kind,
            bounds: WorldRect::new(
                WorldPoint::new(column as f32 * 32.0, row as f32 * 32.0),
                32.0,
                32.0,
            ),
        }
    }

    #[test]
    fn draws_tiles_and_actor_over_them() {
        let scene = Scene::capture(
            camera(),
            [sample(0, 0, TileKind::Water), sample(1, 0, TileKind::Grass)],
            Some(ActorBox::new(WorldPoint::new(40.0, 20.0), 8.0)),
        );
        assert_eq!(draw(&scene), "~~..\n~~@.\n");
    }

    #[test]
    fn partially_visible_tiles_are_clipped() {
        let scene = Scene::capture(camera(), [sample(3, 1, TileKind::Mountain)], None);
        assert_eq!(draw(&scene), "    \n    \n");

        let scene = Scene::capture(camera(), [sample(1, 0, TileKind::RockObstacle)], None);
        assert_eq!(draw(&scene), "  oo\n  oo\n");
    }

    #[test]
    fn run_applies_every_frame_before_drawing() {
        let mut output = Vec::new();
        let frames = vec![FrameInput::default(); 3];
        let backend = AsciiBackend::new(frames, Duration::from_millis(16), &mut output);
        let scene = Scene::capture(camera(), [sample(0, 0, TileKind::Dirt)], None);

        let calls = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = std::rc::Rc::clone(&calls);
        backend
            .run(
                Presentation::new("Test", CLEAR_COLOR, scene),
                move |dt, _, _| {
                    assert_eq!(dt, Duration::from_millis(16));
                    counter.set(counter.get() + 1);
                },
            )
            .expect("rendered");

        assert_eq!(calls.get(), 3);
        assert_eq!(
            String::from_utf8(output).expect("utf-8"),
            "Test\n::  \n::  \n"
        );
    }
}
