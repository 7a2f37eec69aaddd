#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that resolves actor motion against the tile grid.
//!
//! Motion is resolved one axis at a time: the horizontal component is swept
//! and clamped first, then the vertical component is swept from the already
//! resolved horizontal position. A diagonal push into a wall therefore keeps
//! sliding along the open axis. Each sweep covers the full span travelled by
//! the box, so large deltas cannot tunnel through thin walls.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wildlands_core::{ActorBox, TileCoord, TileGrid, WorldPoint, WorldRect, WorldVector};

/// Behaviour applied when a sweep along one axis hits a blocked tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionPolicy {
    /// Abandons the blocked axis and keeps the pre-move coordinate.
    #[default]
    Rollback,
    /// Advances the box until it touches the first blocking tile edge.
    SnapToEdge,
}

/// Tuning knobs for actor movement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Side length of the actor's square bounding box in world units.
    pub actor_size: f32,
    /// Walking speed in world units per second.
    pub speed: f32,
    /// Factor applied to `speed` while sprinting.
    pub sprint_multiplier: f32,
    /// Collision response used by the resolver.
    pub policy: CollisionPolicy,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            actor_size: 64.0,
            speed: 200.0,
            sprint_multiplier: 2.0,
            policy: CollisionPolicy::Rollback,
        }
    }
}

/// Directional input gathered for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MovementIntent {
    horizontal: i8,
    vertical: i8,
    sprint: bool,
}

impl MovementIntent {
    /// Intent that produces no motion.
    pub const IDLE: Self = Self {
        horizontal: 0,
        vertical: 0,
        sprint: false,
    };

    /// Creates an intent; each axis is reduced to its sign.
    #[must_use]
    pub const fn new(horizontal: i8, vertical: i8, sprint: bool) -> Self {
        Self {
            horizontal: horizontal.signum(),
            vertical: vertical.signum(),
            sprint,
        }
    }

    /// Horizontal direction: `-1` left, `1` right, `0` none.
    #[must_use]
    pub const fn horizontal(&self) -> i8 {
        self.horizontal
    }

    /// Vertical direction: `-1` up, `1` down, `0` none.
    #[must_use]
    pub const fn vertical(&self) -> i8 {
        self.vertical
    }

    /// Whether the sprint modifier is held.
    #[must_use]
    pub const fn sprint(&self) -> bool {
        self.sprint
    }

    /// Converts the intent into a velocity.
    ///
    /// Diagonal input is normalised so it is no faster than straight input.
    #[must_use]
    pub fn velocity(&self, config: &MovementConfig) -> WorldVector {
        let direction = WorldVector::new(f32::from(self.horizontal), f32::from(self.vertical));
        let length = direction.length();
        if length == 0.0 {
            return WorldVector::ZERO;
        }

        let speed = if self.sprint {
            config.speed * config.sprint_multiplier
        } else {
            config.speed
        };
        direction.scaled(speed / length)
    }
}

/// Integrates a velocity over the provided delta time.
#[must_use]
pub fn displacement(velocity: WorldVector, dt: Duration) -> WorldVector {
    velocity.scaled(dt.as_secs_f32())
}

/// Resolves requested displacements into legal actor positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementResolver {
    policy: CollisionPolicy,
}

impl MovementResolver {
    /// Creates a resolver using the provided collision policy.
    #[must_use]
    pub const fn new(policy: CollisionPolicy) -> Self {
        Self { policy }
    }

    /// Creates a resolver from the movement configuration.
    #[must_use]
    pub const fn from_config(config: &MovementConfig) -> Self {
        Self::new(config.policy)
    }

    /// Collision policy applied by the resolver.
    #[must_use]
    pub const fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Moves the actor by `(dx, dy)`, resolving X before Y.
    ///
    /// Never fails: non-finite deltas are ignored and a blocked axis keeps (or
    /// snaps toward) its previous coordinate. Starting from a legal box the
    /// result never overlaps an impassable tile and never leaves the map.
    #[must_use]
    pub fn resolve(&self, actor: ActorBox, dx: f32, dy: f32, grid: &TileGrid) -> ActorBox {
        let actor = self.sweep(actor, sanitize(dx), Axis::Horizontal, grid);
        let actor = self.sweep(actor, sanitize(dy), Axis::Vertical, grid);
        clamp_to_map(actor, grid)
    }

    /// Integrates the velocity over `dt` and resolves the resulting displacement.
    #[must_use]
    pub fn step(
        &self,
        actor: ActorBox,
        velocity: WorldVector,
        dt: Duration,
        grid: &TileGrid,
    ) -> ActorBox {
        let delta = displacement(velocity, dt);
        self.resolve(actor, delta.x, delta.y, grid)
    }

    fn sweep(&self, actor: ActorBox, delta: f32, axis: Axis, grid: &TileGrid) -> ActorBox {
        if delta == 0.0 {
            return actor;
        }

        let start = axis.start(&actor);
        let target = start + delta;
        let placed = axis.place(actor, target);
        let swept = axis.swept(&actor, target);
        if grid.is_region_clear(&swept) && grid.is_region_clear(&placed.rect()) {
            return placed;
        }

        match self.policy {
            CollisionPolicy::Rollback => actor,
            CollisionPolicy::SnapToEdge => {
                let snapped = axis.place(actor, snap(&actor, delta, axis, grid));
                if grid.is_region_clear(&snapped.rect()) {
                    snapped
                } else {
                    actor
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn start(self, actor: &ActorBox) -> f32 {
        match self {
            Self::Horizontal => actor.x(),
            Self::Vertical => actor.y(),
        }
    }

    fn place(self, actor: ActorBox, value: f32) -> ActorBox {
        match self {
            Self::Horizontal => actor.with_x(value),
            Self::Vertical => actor.with_y(value),
        }
    }

    fn swept(self, actor: &ActorBox, target: f32) -> WorldRect {
        let start = self.start(actor);
        let low = start.min(target);
        let length = (start.max(target) - low) + actor.size();
        match self {
            Self::Horizontal => WorldRect::new(WorldPoint::new(low, actor.y()), length, actor.size()),
            Self::Vertical => WorldRect::new(WorldPoint::new(actor.x(), low), actor.size(), length),
        }
    }

    fn lines(self, grid: &TileGrid) -> u32 {
        match self {
            Self::Horizontal => grid.columns(),
            Self::Vertical => grid.rows(),
        }
    }

    fn coord(self, line: u32, cross: u32) -> TileCoord {
        match self {
            Self::Horizontal => TileCoord::new(line, cross),
            Self::Vertical => TileCoord::new(cross, line),
        }
    }
}

/// Finds the furthest coordinate along `axis` before the first blocking line.
fn snap(actor: &ActorBox, delta: f32, axis: Axis, grid: &TileGrid) -> f32 {
    let start = axis.start(actor);
    let Some(span) = grid.covering_span(&actor.rect()) else {
        return start;
    };
    let (cross_first, cross_last) = match axis {
        Axis::Horizontal => (span.first_row, span.last_row),
        Axis::Vertical => (span.first_column, span.last_column),
    };

    let tile_length = grid.tile_length();
    let size = actor.size();
    let target = start + delta;
    let line_count = i64::from(axis.lines(grid));
    let blocked = |line: i64| {
        if line < 0 || line >= line_count {
            return true;
        }
        (cross_first..=cross_last)
            .any(|cross| grid.is_impassable(axis.coord(line as u32, cross)) != Some(false))
    };

    if delta > 0.0 {
        let next = ((start + size) / tile_length).ceil() as i64;
        let last = ((target + size) / tile_length).ceil() as i64 - 1;
        (next..=last)
            .find(|line| blocked(*line))
            .map_or(start, |line| (line as f32 * tile_length - size).max(start))
    } else {
        let next = (start / tile_length).floor() as i64 - 1;
        let last = (target / tile_length).floor() as i64;
        (last..=next)
            .rev()
            .find(|line| blocked(*line))
            .map_or(start, |line| ((line + 1) as f32 * tile_length).min(start))
    }
}

fn clamp_to_map(actor: ActorBox, grid: &TileGrid) -> ActorBox {
    if grid.covering_span(&actor.rect()).is_some() {
        return actor;
    }

    let max_x = (grid.width() - actor.size()).max(0.0);
    let max_y = (grid.height() - actor.size()).max(0.0);
    ActorBox::new(
        WorldPoint::new(actor.x().clamp(0.0, max_x), actor.y().clamp(0.0, max_y)),
        actor.size(),
    )
}

fn sanitize(delta: f32) -> f32 {
    if delta.is_finite() {
        delta
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_reduces_axes_to_their_sign() {
        let intent = MovementIntent::new(5, -3, false);
        assert_eq!(intent.horizontal(), 1);
        assert_eq!(intent.vertical(), -1);
    }

    #[test]
    fn diagonal_intent_is_normalised() {
        let config = MovementConfig::default();
        let velocity = MovementIntent::new(1, 1, false).velocity(&config);
        assert!((velocity.length() - config.speed).abs() < 1e-3);
        assert!((velocity.x - velocity.y).abs() < f32::EPSILON);
    }

    #[test]
    fn sprint_scales_speed() {
        let config = MovementConfig::default();
        let velocity = MovementIntent::new(-1, 0, true).velocity(&config);
        assert_eq!(velocity, WorldVector::new(-400.0, 0.0));
    }

    #[test]
    fn idle_intent_has_no_velocity() {
        let config = MovementConfig::default();
        assert_eq!(MovementIntent::IDLE.velocity(&config), WorldVector::ZERO);
    }

    #[test]
    fn displacement_integrates_over_delta_time() {
        let delta = displacement(WorldVector::new(200.0, -100.0), Duration::from_millis(500));
        assert_eq!(delta, WorldVector::new(100.0, -50.0));
    }

    #[test]
    fn swept_rect_covers_start_and_target() {
        let actor = ActorBox::new(WorldPoint::new(10.0, 20.0), 8.0);
        let swept = Axis::Horizontal.swept(&actor, 4.0);
        assert_eq!(swept, WorldRect::new(WorldPoint::new(4.0, 20.0), 14.0, 8.0));
        let swept = Axis::Vertical.swept(&actor, 30.0);
        assert_eq!(swept, WorldRect::new(WorldPoint::new(10.0, 20.0), 8.0, 18.0));
    }
}
