#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Raycast Arena adapters.
//!
//! Besides the descriptors exchanged with backends this crate hosts the pure
//! projection code: [`raycast`] turns a [`Scene`] into wall columns and
//! sprites for the first-person viewport and [`minimap`] lays out the
//! top-down overview. Backends only rasterise the resulting primitives.

pub mod minimap;
pub mod raycast;

use anyhow::Result as AnyResult;
use raycast_arena_core::{
    GridMap, HostileSnapshot, HudSnapshot, InputEvent, MovementIntent, PickupSnapshot,
    PlayerSnapshot, SessionSummary, ShotTrace,
};
use std::{error::Error, fmt, time::Duration};

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

    /// Returns the color darkened towards black, keeping `factor` of its intensity.
    #[must_use]
    pub fn shaded(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);

        Self {
            red: self.red * factor,
            green: self.green * factor,
            blue: self.blue * factor,
            alpha: self.alpha,
        }
    }

    /// Returns the color with its alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Directions held during the frame.
    pub intent: MovementIntent,
    /// Horizontal look movement accumulated during the frame, in input units.
    pub look_delta: f32,
    /// Discrete inputs in the order they were observed.
    pub events: Vec<InputEvent>,
    /// Whether the player asked for a new session.
    pub restart: bool,
}

/// Everything a backend needs to present one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Arena being played.
    pub map: GridMap,
    /// Viewpoint of the first-person projection.
    pub player: PlayerSnapshot,
    /// Live hostiles.
    pub hostiles: Vec<HostileSnapshot>,
    /// Uncollected pickups.
    pub pickups: Vec<PickupSnapshot>,
    /// Most recent discharge, if any.
    pub last_shot: Option<ShotTrace>,
    /// Simulation time the scene was captured at.
    pub now: Duration,
    /// Heads-up display data.
    pub hud: HudSnapshot,
    /// Final tally shown once the session ended.
    pub summary: Option<SessionSummary>,
}

impl Scene {
    /// Creates a scene with no entities on `map`.
    #[must_use]
    pub fn new(map: GridMap, player: PlayerSnapshot, hud: HudSnapshot) -> Self {
        Self {
            map,
            player,
            hostiles: Vec::new(),
            pickups: Vec::new(),
            last_shot: None,
            now: Duration::ZERO,
            hud,
            summary: None,
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

/// Rendering backend capable of presenting Raycast Arena scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the presentation
    /// timestamp, per-frame input captured by the adapter, and mutates the
    /// scene before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Viewports must cover at least one pixel on both axes.
    EmptyViewport {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyViewport { width, height } => {
                write!(f, "viewport must be non-empty (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shading_scales_channels_but_not_alpha() {
        let grey = Color::from_rgb_u8(150, 150, 150).shaded(0.5);
        assert!((grey.red - 75.0 / 255.0).abs() < 1e-6);
        assert_eq!(grey.alpha, 1.0);
        assert_eq!(Color::new(1.0, 1.0, 1.0, 1.0).shaded(-3.0).red, 0.0);
    }

    #[test]
    fn rendering_error_reports_dimensions() {
        let error = RenderingError::EmptyViewport {
            width: 0,
            height: 480,
        };
        assert_eq!(error.to_string(), "viewport must be non-empty (received 0x480)");
    }
}
