//! First-person projection of a [`Scene`] onto a pixel viewport.
//!
//! Every screen column casts one ray from the player. The tangent-based
//! mapping from column to ray angle keeps straight walls straight. Entities
//! are projected with the same mapping, drawn back to front and hidden when
//! the wall recorded for their centre column is nearer.

use std::{f32::consts::PI, time::Duration};

use glam::Vec2;
use raycast_arena_core::{GridMap, PickupKind, WorldPoint};

use crate::{Color, RenderingError, Scene};

/// Horizontal field of view in radians.
pub const FIELD_OF_VIEW: f32 = PI / 3.0;
/// Distance between successive ray samples, in tiles.
pub const RAY_STEP: f32 = 0.05;
/// Distance reported for rays that never meet a wall.
pub const MAX_DEPTH: f32 = 16.0;
/// Sprite height relative to a wall at the same distance.
pub const SPRITE_SCALE: f32 = 0.7;
/// How long a struck hostile keeps its flash colour.
pub const HIT_FLASH: Duration = Duration::from_millis(200);
/// How long the shot trace stays visible.
pub const TRACE_WINDOW: Duration = Duration::from_millis(100);

/// Wall colour at zero distance.
pub const WALL_COLOR: Color = Color::from_rgb_u8(150, 150, 150);
/// Hostile colour.
pub const HOSTILE_COLOR: Color = Color::from_rgb_u8(255, 0, 0);
/// Hostile colour shortly after being struck.
pub const HOSTILE_FLASH_COLOR: Color = Color::from_rgb_u8(255, 165, 0);
/// Health pickup colour.
pub const HEALTH_PICKUP_COLOR: Color = Color::from_rgb_u8(0, 128, 0);
/// Ammunition pickup colour.
pub const AMMO_PICKUP_COLOR: Color = Color::from_rgb_u8(0, 0, 255);
/// Shot trace colour.
pub const TRACE_COLOR: Color = Color::from_rgb_u8(255, 255, 0);

/// Pixel dimensions of the first-person view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Creates a viewport, rejecting empty dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::EmptyViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    fn projection_plane_distance(&self) -> f32 {
        (self.width as f32 / 2.0) / (FIELD_OF_VIEW / 2.0).tan()
    }
}

/// Vertical wall slice drawn in one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallColumn {
    /// Screen column.
    pub x: u32,
    /// Distance the ray travelled before meeting a wall.
    pub distance: f32,
    /// First pixel row covered by the slice.
    pub top: f32,
    /// Number of pixel rows covered by the slice.
    pub height: f32,
    /// Shaded slice colour.
    pub color: Color,
}

/// What a sprite represents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpriteKind {
    /// A hostile with its remaining health and hit flash state.
    Hostile {
        /// Remaining health relative to the spawn health, in `[0, 1]`.
        health_ratio: f32,
        /// Whether the hostile was struck within [`HIT_FLASH`].
        flashing: bool,
    },
    /// A pickup of the given kind.
    Pickup(PickupKind),
}

/// Screen-space square standing in for an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteQuad {
    /// Entity represented by the quad.
    pub kind: SpriteKind,
    /// Euclidean distance from the player.
    pub distance: f32,
    /// Left edge in pixels.
    pub left: f32,
    /// Top edge in pixels.
    pub top: f32,
    /// Side length in pixels.
    pub size: f32,
    /// Fill colour.
    pub color: Color,
}

/// Line from the screen centre towards the last shot's end point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceLine {
    /// Start of the line in pixels.
    pub from: Vec2,
    /// End of the line in pixels.
    pub to: Vec2,
    /// Stroke colour.
    pub color: Color,
}

/// Complete first-person frame description.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Wall slices, one per screen column.
    pub columns: Vec<WallColumn>,
    /// Wall distance per screen column.
    pub depth: Vec<f32>,
    /// Visible sprites ordered from farthest to nearest.
    pub sprites: Vec<SpriteQuad>,
    /// Shot trace, while it is visible and inside the field of view.
    pub trace: Option<TraceLine>,
}

/// Projects `scene` onto `viewport`.
#[must_use]
pub fn render(scene: &Scene, viewport: Viewport) -> Frame {
    let facing = scene.player.heading.radians();
    let half_fov_tan = (FIELD_OF_VIEW / 2.0).tan();
    let width = viewport.width() as f32;

    let mut columns = Vec::with_capacity(viewport.width() as usize);
    let mut depth = Vec::with_capacity(viewport.width() as usize);
    for x in 0..viewport.width() {
        let camera_x = 2.0 * x as f32 / width - 1.0;
        let angle = facing + (camera_x * half_fov_tan).atan();
        let distance = cast_ray(&scene.map, scene.player.position, angle);
        depth.push(distance);
        columns.push(wall_column(x, distance, viewport));
    }

    let sprites = project_sprites(scene, viewport, &depth);
    let trace = project_trace(scene, viewport);

    Frame {
        columns,
        depth,
        sprites,
        trace,
    }
}

/// Distance from `origin` along `angle` to the first wall, capped at [`MAX_DEPTH`].
///
/// Leaving the grid counts as reaching the maximum depth.
#[must_use]
pub fn cast_ray(map: &GridMap, origin: WorldPoint, angle: f32) -> f32 {
    let columns = i64::from(map.columns());
    let rows = i64::from(map.rows());

    let mut step = 0_u32;
    loop {
        step += 1;
        let distance = step as f32 * RAY_STEP;
        if distance >= MAX_DEPTH {
            return MAX_DEPTH;
        }

        let (column, row) = origin.along(angle, distance).tile_indices();
        if column < 0 || row < 0 || column >= columns || row >= rows {
            return MAX_DEPTH;
        }
        if !map.tile(column, row).is_walkable() {
            return distance;
        }
    }
}

fn wall_column(x: u32, distance: f32, viewport: Viewport) -> WallColumn {
    let screen_height = viewport.height() as f32;
    let line_height = screen_height / distance;
    let top = (screen_height / 2.0 - line_height / 2.0).max(0.0);
    let bottom = (screen_height / 2.0 + line_height / 2.0).min(screen_height - 1.0);
    let shade = (1.0 - distance / MAX_DEPTH).max(0.0);

    WallColumn {
        x,
        distance,
        top,
        height: (bottom - top).max(0.0),
        color: WALL_COLOR.shaded(shade),
    }
}

fn project_sprites(scene: &Scene, viewport: Viewport, depth: &[f32]) -> Vec<SpriteQuad> {
    let hostiles = scene.hostiles.iter().map(|hostile| {
        let flashing = hostile
            .last_hit
            .is_some_and(|hit| scene.now.saturating_sub(hit) < HIT_FLASH);
        let health_ratio = if hostile.max_health == 0 {
            0.0
        } else {
            (hostile.health / hostile.max_health as f32).clamp(0.0, 1.0)
        };
        (
            hostile.position,
            SpriteKind::Hostile {
                health_ratio,
                flashing,
            },
        )
    });
    let pickups = scene
        .pickups
        .iter()
        .map(|pickup| (pickup.position, SpriteKind::Pickup(pickup.effect.kind())));

    let mut sprites: Vec<SpriteQuad> = hostiles
        .chain(pickups)
        .filter_map(|(position, kind)| project_sprite(scene, viewport, depth, position, kind))
        .collect();
    sprites.sort_by(|a, b| b.distance.total_cmp(&a.distance));
    sprites
}

fn project_sprite(
    scene: &Scene,
    viewport: Viewport,
    depth: &[f32],
    position: WorldPoint,
    kind: SpriteKind,
) -> Option<SpriteQuad> {
    let origin = scene.player.position;
    let distance = origin.distance_to(position);
    if distance <= f32::EPSILON {
        return None;
    }

    let angle = scene.player.heading.signed_offset_to(origin.angle_to(position));
    if angle.abs() >= FIELD_OF_VIEW / 2.0 {
        return None;
    }

    let width = viewport.width() as f32;
    let height = viewport.height() as f32;
    let size = (height / distance) * SPRITE_SCALE;
    let left = angle.tan() * viewport.projection_plane_distance() + width / 2.0 - size / 2.0;
    let top = height / 2.0 - size / 2.0;

    let centre = (left + size / 2.0).floor();
    if centre < 0.0 || centre >= width {
        return None;
    }
    let wall = depth.get(centre as usize).copied().unwrap_or(MAX_DEPTH);
    if distance >= wall {
        return None;
    }

    let color = match kind {
        SpriteKind::Hostile { flashing: true, .. } => HOSTILE_FLASH_COLOR,
        SpriteKind::Hostile { .. } => HOSTILE_COLOR,
        SpriteKind::Pickup(PickupKind::Health) => HEALTH_PICKUP_COLOR,
        SpriteKind::Pickup(PickupKind::Ammo) => AMMO_PICKUP_COLOR,
    };

    Some(SpriteQuad {
        kind,
        distance,
        left,
        top,
        size,
        color,
    })
}

fn project_trace(scene: &Scene, viewport: Viewport) -> Option<TraceLine> {
    let shot = scene.last_shot?;
    if !shot.is_visible(scene.now, TRACE_WINDOW) {
        return None;
    }

    let origin = scene.player.position;
    let angle = scene.player.heading.signed_offset_to(origin.angle_to(shot.end));
    if angle.abs() >= FIELD_OF_VIEW / 2.0 {
        return None;
    }

    let centre = Vec2::new(viewport.width() as f32 / 2.0, viewport.height() as f32 / 2.0);
    let end_x = angle.tan() * viewport.projection_plane_distance() + centre.x;
    Some(TraceLine {
        from: centre,
        to: Vec2::new(end_x, centre.y),
        color: TRACE_COLOR,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use raycast_arena_core::{
        AmmoCount, Heading, HostileId, HostileSnapshot, HudSnapshot, PickupEffect, PickupId,
        PickupSnapshot, PlayerSnapshot, RoundPhase, SessionStatus, ShotTrace, StreakMultiplier,
    };

    fn hud() -> HudSnapshot {
        HudSnapshot {
            health: 100,
            wave: 1,
            streak: StreakMultiplier::BASE,
            ammo: AmmoCount::Unlimited,
            weapon_name: "Pistol",
            score: 0,
            phase: RoundPhase::Active,
            status: SessionStatus::Playing,
            paused: false,
        }
    }

    /// Corridor with a wall three tiles east of the player.
    fn corridor_scene() -> Scene {
        let map = GridMap::parse(
            "##########\n\
             #...#....#\n\
             #........#\n\
             ##########",
        )
        .expect("valid map");
        let player = PlayerSnapshot {
            position: WorldPoint::new(1.0, 1.5),
            heading: Heading::new(0.0),
            health: 100,
        };
        Scene::new(map, player, hud())
    }

    fn hostile(id: u32, x: f32, y: f32) -> HostileSnapshot {
        HostileSnapshot {
            id: HostileId::new(id),
            position: WorldPoint::new(x, y),
            health: 25.0,
            max_health: 50,
            last_attack: None,
            last_hit: None,
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(64, 48).expect("non-empty viewport")
    }

    #[test]
    fn viewport_rejects_empty_dimensions() {
        assert_eq!(
            Viewport::new(0, 10),
            Err(RenderingError::EmptyViewport {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn centre_column_reports_wall_distance() {
        let frame = render(&corridor_scene(), viewport());
        assert_eq!(frame.columns.len(), 64);
        assert_eq!(frame.depth.len(), 64);

        let centre = frame.depth[32];
        assert!((centre - 3.0).abs() <= RAY_STEP + 1e-3, "depth {centre}");
        let column = frame.columns[32];
        assert!((column.height - 48.0 / centre).abs() < 1.0);
        assert!(column.color.red < WALL_COLOR.red, "distant walls are shaded");
    }

    #[test]
    fn walls_hide_entities_behind_them() {
        let mut scene = corridor_scene();
        scene.hostiles = vec![hostile(0, 5.0, 1.5), hostile(1, 2.0, 1.5)];
        let frame = render(&scene, viewport());

        assert_eq!(frame.sprites.len(), 1, "the hostile behind the wall is culled");
        assert!((frame.sprites[0].distance - 1.0).abs() < 1e-5);
        match frame.sprites[0].kind {
            SpriteKind::Hostile { health_ratio, .. } => {
                assert!((health_ratio - 0.5).abs() < 1e-6);
            }
            SpriteKind::Pickup(_) => panic!("expected a hostile sprite"),
        }
    }

    #[test]
    fn sprites_draw_far_to_near_and_cull_outside_the_fov() {
        let mut scene = corridor_scene();
        scene.hostiles = vec![hostile(0, 1.5, 1.5), hostile(1, 1.0, 2.5)];
        scene.pickups = vec![PickupSnapshot {
            id: PickupId::new(0),
            position: WorldPoint::new(2.5, 1.5),
            effect: PickupEffect::Resupply { rounds: 10 },
        }];
        let frame = render(&scene, viewport());

        let distances: Vec<f32> = frame.sprites.iter().map(|sprite| sprite.distance).collect();
        assert_eq!(distances, vec![1.5, 0.5], "the hostile straight below is outside the view");
        assert_eq!(frame.sprites[0].color, AMMO_PICKUP_COLOR);
        assert_eq!(frame.sprites[1].color, HOSTILE_COLOR);
        let expected_size = 48.0 / 0.5 * SPRITE_SCALE;
        assert!((frame.sprites[1].size - expected_size).abs() < 1e-3);
    }

    #[test]
    fn struck_hostiles_flash_briefly() {
        let mut scene = corridor_scene();
        let mut struck = hostile(0, 2.0, 1.5);
        struck.last_hit = Some(Duration::from_millis(1_000));
        scene.hostiles = vec![struck];

        scene.now = Duration::from_millis(1_150);
        assert_eq!(render(&scene, viewport()).sprites[0].color, HOSTILE_FLASH_COLOR);

        scene.now = Duration::from_millis(1_200);
        assert_eq!(render(&scene, viewport()).sprites[0].color, HOSTILE_COLOR);
    }

    #[test]
    fn trace_fades_after_its_window() {
        let mut scene = corridor_scene();
        scene.last_shot = Some(ShotTrace {
            end: WorldPoint::new(4.0, 1.5),
            fired_at: Duration::from_millis(500),
        });

        scene.now = Duration::from_millis(550);
        let trace = render(&scene, viewport()).trace.expect("fresh trace is drawn");
        assert_eq!(trace.from, Vec2::new(32.0, 24.0));
        assert!((trace.to.x - 32.0).abs() < 1e-3);

        scene.now = Duration::from_millis(600);
        assert!(render(&scene, viewport()).trace.is_none());
    }

    #[test]
    fn rays_leaving_the_grid_report_max_depth() {
        let map = GridMap::parse("...\n...\n...").expect("valid map");
        let distance = cast_ray(&map, WorldPoint::new(1.5, 1.5), 0.0);
        assert_eq!(distance, MAX_DEPTH);
    }
}
