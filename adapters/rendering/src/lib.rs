#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Wildlands adapters.
//!
//! The simulation never draws. Adapters position a [`Camera`] over the map,
//! ask the world for the tiles inside [`Camera::visible_rect`], and hand the
//! resulting [`Scene`] to a [`RenderingBackend`].

use anyhow::Result as AnyResult;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt, time::Duration};
use wildlands_core::{ActorBox, TileKind, TileSample, WorldPoint, WorldRect};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Background fill behind the map.
pub const CLEAR_COLOR: Color = Color::from_rgb_u8(50, 50, 50);

/// Fill used for the actor.
pub const ACTOR_COLOR: Color = Color::from_rgb_u8(255, 0, 0);

/// Flat fill used for a tile kind.
#[must_use]
pub const fn tile_color(kind: TileKind) -> Color {
    match kind {
        TileKind::Water => Color::from_rgb_u8(50, 50, 200),
        TileKind::Grass => Color::from_rgb_u8(0, 150, 0),
        TileKind::Dirt => Color::from_rgb_u8(139, 69, 19),
        TileKind::Mountain => Color::from_rgb_u8(100, 100, 100),
        TileKind::TreeObstacle => Color::from_rgb_u8(0, 100, 0),
        TileKind::RockObstacle => Color::from_rgb_u8(80, 80, 80),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Horizontal direction held this frame: `-1` left, `1` right.
    pub horizontal: i8,
    /// Vertical direction held this frame: `-1` up, `1` down.
    pub vertical: i8,
    /// Whether the sprint modifier is held.
    pub sprint: bool,
    /// Zoom steps requested this frame; positive zooms in.
    pub zoom_steps: i8,
}

/// Camera tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Width of the viewport in screen pixels.
    pub viewport_width: f32,
    /// Height of the viewport in screen pixels.
    pub viewport_height: f32,
    /// Zoom applied when a session starts; below 1.0 shows more of the map.
    pub initial_zoom: f32,
    /// Smallest permitted zoom.
    pub min_zoom: f32,
    /// Largest permitted zoom.
    pub max_zoom: f32,
    /// Zoom change per requested step.
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            initial_zoom: 0.5,
            min_zoom: 0.25,
            max_zoom: 2.0,
            zoom_step: 0.25,
        }
    }
}

/// Scrolling, zoomable view onto the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    offset: Vec2,
    zoom: f32,
    viewport: Vec2,
    min_zoom: f32,
    max_zoom: f32,
    zoom_step: f32,
}

impl Camera {
    /// Creates a camera at the map origin.
    ///
    /// Returns an error when the viewport has no area or the zoom bounds are unusable.
    pub fn new(config: &CameraConfig) -> Result<Self, RenderingError> {
        let viewport = Vec2::new(config.viewport_width, config.viewport_height);
        if !(viewport.is_finite() && viewport.x > 0.0 && viewport.y > 0.0) {
            return Err(RenderingError::InvalidViewport {
                width: config.viewport_width,
                height: config.viewport_height,
            });
        }
        let valid_bound = |zoom: f32| zoom.is_finite() && zoom > 0.0;
        if !(valid_bound(config.min_zoom)
            && valid_bound(config.max_zoom)
            && config.min_zoom <= config.max_zoom)
        {
            return Err(RenderingError::InvalidZoomRange {
                min: config.min_zoom,
                max: config.max_zoom,
            });
        }

        let mut camera = Self {
            offset: Vec2::ZERO,
            zoom: config.min_zoom,
            viewport,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
        };
        let _ = camera.set_zoom(config.initial_zoom);
        Ok(camera)
    }

    /// World coordinate shown at the top-left corner of the viewport.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Screen pixels per world unit.
    #[must_use]
    pub const fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Viewport size in screen pixels.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Sets the zoom within the configured bounds and returns the applied value.
    ///
    /// Non-finite requests leave the zoom unchanged.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
        self.zoom
    }

    /// Applies `steps` zoom increments; positive values zoom in.
    pub fn apply_zoom_steps(&mut self, steps: i8) -> f32 {
        self.set_zoom(self.zoom + f32::from(steps) * self.zoom_step)
    }

    /// Centres the view on `target`, clamped so it never scrolls past the map.
    ///
    /// When the map is smaller than the view the offset pins to the map origin.
    pub fn follow(&mut self, target: WorldPoint, map_width: f32, map_height: f32) {
        let visible = self.viewport / self.zoom;
        let desired = Vec2::new(target.x, target.y) - visible / 2.0;
        let max_offset = Vec2::new(map_width, map_height) - visible;
        self.offset = desired.min(max_offset).max(Vec2::ZERO);
    }

    /// World rectangle currently inside the viewport.
    #[must_use]
    pub fn visible_rect(&self) -> WorldRect {
        let visible = self.viewport / self.zoom;
        WorldRect::new(
            WorldPoint::new(self.offset.x, self.offset.y),
            visible.x,
            visible.y,
        )
    }

    /// Projects a world point into screen pixels.
    #[must_use]
    pub fn world_to_screen(&self, point: WorldPoint) -> Vec2 {
        (Vec2::new(point.x, point.y) - self.offset) * self.zoom
    }

    /// Projects screen pixels back into world space.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> WorldPoint {
        let world = screen / self.zoom + self.offset;
        WorldPoint::new(world.x, world.y)
    }

    /// Converts a world length into screen pixels.
    #[must_use]
    pub fn scale(&self, length: f32) -> f32 {
        length * self.zoom
    }
}

/// Tile positioned in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTile {
    /// Terrain drawn at the tile.
    pub kind: TileKind,
    /// Fill color for the terrain.
    pub color: Color,
    /// Top-left corner in screen pixels.
    pub origin: Vec2,
    /// Side length in screen pixels.
    pub size: f32,
}

/// Actor positioned in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneActor {
    /// Top-left corner in screen pixels.
    pub origin: Vec2,
    /// Side length in screen pixels.
    pub size: f32,
    /// Fill color.
    pub color: Color,
}

/// Scene description combining the visible terrain and the actor.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tiles intersecting the camera view.
    pub tiles: Vec<SceneTile>,
    /// Actor, when one is spawned.
    pub actor: Option<SceneActor>,
    /// Camera the scene was projected through.
    pub camera: Camera,
}

impl Scene {
    /// Projects the tiles returned by the render query and the actor through the camera.
    #[must_use]
    pub fn capture<I>(camera: Camera, tiles: I, actor: Option<ActorBox>) -> Self
    where
        I: IntoIterator<Item = TileSample>,
    {
        let tiles = tiles
            .into_iter()
            .map(|sample| SceneTile {
                kind: sample.kind,
                color: tile_color(sample.kind),
                origin: camera.world_to_screen(sample.bounds.origin()),
                size: camera.scale(sample.bounds.width()),
            })
            .collect();
        let actor = actor.map(|actor| SceneActor {
            origin: camera.world_to_screen(actor.origin()),
            size: camera.scale(actor.size()),
            color: ACTOR_COLOR,
        });
        Self {
            tiles,
            actor,
            camera,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Wildlands scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and the input captured by the adapter, and rebuilds the scene before it
    /// is presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The viewport must have a positive, finite size.
    InvalidViewport {
        /// Provided viewport width.
        width: f32,
        /// Provided viewport height.
        height: f32,
    },
    /// Zoom bounds must be positive, finite and ordered.
    InvalidZoomRange {
        /// Provided lower bound.
        min: f32,
        /// Provided upper bound.
        max: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(f, "viewport must have a positive size (received {width}x{height})")
            }
            Self::InvalidZoomRange { min, max } => {
                write!(f, "zoom range {min}..={max} is not usable")
            }
        }
    }
}

impl Error for RenderingError {}
