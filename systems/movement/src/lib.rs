#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player movement system translating per-frame intents into world commands.

use std::{f32::consts::FRAC_PI_2, time::Duration};

use raycast_arena_core::{Command, Event, Heading, MovementIntent, SessionStatus};

/// Radians turned per unit of look delta at a sensitivity of one.
pub const LOOK_RADIANS_PER_UNIT: f32 = 0.005;

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    speed: f32,
    look_sensitivity: f32,
}

impl Config {
    /// Creates a new configuration from a speed in tiles per second and a look sensitivity.
    #[must_use]
    pub const fn new(speed: f32, look_sensitivity: f32) -> Self {
        Self {
            speed,
            look_sensitivity,
        }
    }

    /// Walking speed measured in tiles per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Multiplier applied to look deltas.
    #[must_use]
    pub const fn look_sensitivity(&self) -> f32 {
        self.look_sensitivity
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(6.0, 1.0)
    }
}

/// Pure system that converts movement intents and look deltas into commands.
#[derive(Debug)]
pub struct Movement {
    config: Config,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Consumes the frame's events and input to emit player commands.
    ///
    /// Turning happens as soon as a look delta is observed; translation scales
    /// with the simulated time advanced in `events`.
    pub fn handle(
        &mut self,
        events: &[Event],
        status: SessionStatus,
        heading: Heading,
        intent: MovementIntent,
        look_delta: f32,
        out: &mut Vec<Command>,
    ) {
        if status == SessionStatus::Over {
            return;
        }

        let mut heading = heading;
        if look_delta != 0.0 && look_delta.is_finite() {
            let radians = look_delta * LOOK_RADIANS_PER_UNIT * self.config.look_sensitivity;
            heading = heading.rotated(radians);
            out.push(Command::TurnPlayer { radians });
        }

        if intent.is_idle() {
            return;
        }

        let elapsed = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        if elapsed.is_zero() {
            return;
        }

        let (dx, dy) = displacement(heading, intent, self.config.speed * elapsed.as_secs_f32());
        if dx != 0.0 || dy != 0.0 {
            out.push(Command::MovePlayer { dx, dy });
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Sums the displacement requested by each active direction.
fn displacement(heading: Heading, intent: MovementIntent, distance: f32) -> (f32, f32) {
    let facing = heading.radians();
    let mut dx = 0.0;
    let mut dy = 0.0;
    let mut push = |angle: f32, sign: f32| {
        dx += angle.cos() * distance * sign;
        dy += angle.sin() * distance * sign;
    };

    if intent.forward {
        push(facing, 1.0);
    }
    if intent.back {
        push(facing, -1.0);
    }
    if intent.strafe_left {
        push(facing - FRAC_PI_2, 1.0);
    }
    if intent.strafe_right {
        push(facing + FRAC_PI_2, 1.0);
    }

    (dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_intents_cancel_out() {
        let intent = MovementIntent {
            forward: true,
            back: true,
            ..MovementIntent::default()
        };
        let (dx, dy) = displacement(Heading::new(0.3), intent, 1.0);
        assert!(dx.abs() < 1e-6 && dy.abs() < 1e-6);
    }

    #[test]
    fn strafing_right_is_a_quarter_turn_clockwise_on_screen() {
        let intent = MovementIntent {
            strafe_right: true,
            ..MovementIntent::default()
        };
        let (dx, dy) = displacement(Heading::new(0.0), intent, 2.0);
        assert!(dx.abs() < 1e-6);
        assert!((dy - 2.0).abs() < 1e-6);
    }
}
