//! Translation of raw device state into [`FrameInput`].

use glam::Vec2;
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_pressed, is_mouse_button_released,
    mouse_position, KeyCode, MouseButton,
};
use raycast_arena_core::{InputEvent, MovementIntent, WeaponKind};
use raycast_arena_rendering::FrameInput;

/// Look units produced per second while an arrow key is held.
pub const KEY_TURN_RATE: f32 = 400.0;

/// Device state sampled once per frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputObservations {
    /// `W` is held.
    pub forward: bool,
    /// `S` is held.
    pub back: bool,
    /// `A` is held.
    pub strafe_left: bool,
    /// `D` is held.
    pub strafe_right: bool,
    /// Left arrow is held.
    pub turn_left: bool,
    /// Right arrow is held.
    pub turn_right: bool,
    /// Cursor position in window pixels.
    pub cursor: Vec2,
    /// The left mouse button went down this frame.
    pub fire_pressed: bool,
    /// The left mouse button went up this frame.
    pub fire_released: bool,
    /// Number key pressed this frame, if any.
    pub weapon_slot: Option<u8>,
    /// `R` went down this frame.
    pub reload: bool,
    /// `Escape` or `P` went down this frame.
    pub pause: bool,
    /// `Enter` went down this frame.
    pub restart: bool,
}

impl InputObservations {
    pub(crate) fn poll() -> Self {
        let (cursor_x, cursor_y) = mouse_position();
        let weapon_slot = [(KeyCode::Key1, 1), (KeyCode::Key2, 2), (KeyCode::Key3, 3)]
            .into_iter()
            .find(|(key, _)| is_key_pressed(*key))
            .map(|(_, slot)| slot);

        Self {
            forward: is_key_down(KeyCode::W),
            back: is_key_down(KeyCode::S),
            strafe_left: is_key_down(KeyCode::A),
            strafe_right: is_key_down(KeyCode::D),
            turn_left: is_key_down(KeyCode::Left),
            turn_right: is_key_down(KeyCode::Right),
            cursor: Vec2::new(cursor_x, cursor_y),
            fire_pressed: is_mouse_button_pressed(MouseButton::Left),
            fire_released: is_mouse_button_released(MouseButton::Left),
            weapon_slot,
            reload: is_key_pressed(KeyCode::R),
            pause: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::P),
            restart: is_key_pressed(KeyCode::Enter),
        }
    }
}

/// Turns successive observations into frame inputs.
///
/// Horizontal look comes from cursor travel between frames plus held arrow
/// keys. The first observation after construction or [`reset_pointer`]
/// contributes no cursor travel, so the view never jumps when the pointer
/// re-enters the window.
///
/// [`reset_pointer`]: InputTranslator::reset_pointer
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct InputTranslator {
    last_cursor: Option<Vec2>,
}

impl InputTranslator {
    /// Creates a translator with no cursor history.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_cursor: None }
    }

    /// Forgets the previous cursor position.
    pub fn reset_pointer(&mut self) {
        self.last_cursor = None;
    }

    /// Builds the frame input for `observations` sampled `dt_seconds` after the previous frame.
    pub fn translate(&mut self, observations: &InputObservations, dt_seconds: f32) -> FrameInput {
        let pointer = self
            .last_cursor
            .map_or(0.0, |last| observations.cursor.x - last.x);
        self.last_cursor = Some(observations.cursor);

        let mut keyboard = 0.0;
        if observations.turn_left {
            keyboard -= KEY_TURN_RATE * dt_seconds;
        }
        if observations.turn_right {
            keyboard += KEY_TURN_RATE * dt_seconds;
        }

        let mut events = Vec::new();
        if observations.pause {
            events.push(InputEvent::TogglePause);
        }
        if let Some(kind) = observations.weapon_slot.and_then(WeaponKind::from_slot) {
            events.push(InputEvent::SelectWeapon(kind));
        }
        if observations.reload {
            events.push(InputEvent::Reload);
        }
        if observations.fire_pressed {
            events.push(InputEvent::FireDown);
        }
        if observations.fire_released {
            events.push(InputEvent::FireUp);
        }

        FrameInput {
            intent: MovementIntent {
                forward: observations.forward,
                back: observations.back,
                strafe_left: observations.strafe_left,
                strafe_right: observations.strafe_right,
            },
            look_delta: pointer + keyboard,
            events,
            restart: observations.restart,
        }
    }
}
