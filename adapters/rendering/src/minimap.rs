//! Top-down overview drawn in the corner of the screen.

use glam::Vec2;
use raycast_arena_core::{PickupKind, Tile};

use crate::{Color, Scene};

/// Pixels per tile used by the default overlay.
pub const DEFAULT_SCALE: f32 = 10.0;
/// Side length of hostile markers in pixels.
pub const HOSTILE_MARKER: f32 = 4.0;
/// Radius of the player marker in pixels.
pub const PLAYER_RADIUS: f32 = 4.0;

const WALL: Color = Color::from_rgb_u8(128, 128, 128);
const MARKER: Color = Color::from_rgb_u8(0, 128, 0);
const FLOOR: Color = Color::from_rgb_u8(0, 0, 0);
const HEALTH: Color = Color::from_rgb_u8(0, 128, 0);
const AMMO: Color = Color::from_rgb_u8(0, 0, 255);
const HOSTILE: Color = Color::from_rgb_u8(255, 0, 0);
const PLAYER: Color = Color::from_rgb_u8(0, 0, 255);

/// Axis-aligned filled rectangle in overlay pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
    /// Fill colour.
    pub color: Color,
}

/// Player marker with its facing line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerMarker {
    /// Circle centre.
    pub centre: Vec2,
    /// Circle radius.
    pub radius: f32,
    /// End of the line pointing along the facing direction, one tile long.
    pub facing: Vec2,
    /// Marker colour.
    pub color: Color,
}

/// Primitives of one overlay frame, in draw order.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// One rectangle per map cell.
    pub cells: Vec<Rect>,
    /// Pickups followed by hostiles.
    pub markers: Vec<Rect>,
    /// The player.
    pub player: PlayerMarker,
}

/// Lays out the overview of `scene` with `scale` pixels per tile.
#[must_use]
pub fn layout(scene: &Scene, scale: f32) -> Layout {
    let map = &scene.map;
    let mut cells = Vec::with_capacity((map.columns() * map.rows()) as usize);
    for row in 0..map.rows() {
        for column in 0..map.columns() {
            let color = match map.tile(i64::from(column), i64::from(row)) {
                Tile::Wall => WALL,
                Tile::HealthMarker => MARKER,
                Tile::Open => FLOOR,
            };
            cells.push(Rect {
                origin: Vec2::new(column as f32, row as f32) * scale,
                size: Vec2::splat(scale),
                color,
            });
        }
    }

    let pickups = scene.pickups.iter().map(|pickup| {
        let centre = Vec2::new(pickup.position.x(), pickup.position.y()) * scale;
        Rect {
            origin: centre - Vec2::splat(scale / 2.0),
            size: Vec2::splat(scale),
            color: match pickup.effect.kind() {
                PickupKind::Health => HEALTH,
                PickupKind::Ammo => AMMO,
            },
        }
    });
    let hostiles = scene.hostiles.iter().map(|hostile| {
        let centre = Vec2::new(hostile.position.x(), hostile.position.y()) * scale;
        Rect {
            origin: centre - Vec2::splat(HOSTILE_MARKER / 2.0),
            size: Vec2::splat(HOSTILE_MARKER),
            color: HOSTILE,
        }
    });
    let markers = pickups.chain(hostiles).collect();

    let position = scene.player.position;
    let tip = position.along(scene.player.heading.radians(), 1.0);
    let player = PlayerMarker {
        centre: Vec2::new(position.x(), position.y()) * scale,
        radius: PLAYER_RADIUS,
        facing: Vec2::new(tip.x(), tip.y()) * scale,
        color: PLAYER,
    };

    Layout {
        cells,
        markers,
        player,
    }
}
