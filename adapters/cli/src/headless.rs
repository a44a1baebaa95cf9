//! Windowless smoke run with scripted input.

use std::time::Duration;

use raycast_arena_core::{InputEvent, MovementIntent, SessionSummary};
use raycast_arena_simulation::Simulation;
use raycast_arena_system_analytics::summarize;

/// Fixed frame length of a headless run.
pub(crate) const FRAME: Duration = Duration::from_millis(16);
/// Look units applied every frame so the player sweeps the arena.
const LOOK_PER_FRAME: f32 = 3.0;

/// Outcome of a headless run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Report {
    pub(crate) frames: u32,
    pub(crate) died: bool,
    pub(crate) notifications: usize,
    pub(crate) summary: SessionSummary,
}

/// Runs up to `frames` frames, holding the trigger while turning in place.
///
/// Stops early when the player dies.
pub(crate) fn run(simulation: &mut Simulation, frames: u32) -> Report {
    let mut played = 0;
    let mut notifications = 0;
    for _ in 0..frames {
        if simulation.is_over() {
            break;
        }
        if !simulation.trigger_held() {
            simulation.handle_input(InputEvent::FireDown);
        }
        simulation.step(FRAME, MovementIntent::default(), LOOK_PER_FRAME);
        notifications += simulation.drain_notifications().count();
        played += 1;
    }

    let summary = simulation
        .take_summary()
        .unwrap_or_else(|| summarize(&simulation.round()));
    Report {
        frames: played,
        died: simulation.is_over(),
        notifications,
        summary,
    }
}
