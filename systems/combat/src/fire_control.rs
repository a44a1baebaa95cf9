//! Trigger state and automatic fire cadence.

use std::time::Duration;

use raycast_arena_timers::{Due, TaskHandle, Timers};

/// Tracks whether the trigger is held and when the next automatic shot is due.
///
/// The cadence runs on simulated time, so nothing fires while the caller
/// stops advancing it. At most one shot becomes due per [`FireControl::advance`]
/// call, and a new shot is only scheduled once the caller re-arms with the
/// weapon's current interval.
#[derive(Debug, Default)]
pub struct FireControl {
    timers: Timers<()>,
    due: Vec<Due<()>>,
    repeat: Option<TaskHandle>,
    last_shot_at: Duration,
    held: bool,
}

impl FireControl {
    /// Creates a released trigger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether the trigger is currently held.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held
    }

    /// Reports whether an automatic shot is scheduled.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.repeat
            .is_some_and(|handle| self.timers.is_pending(handle))
    }

    /// Presses the trigger and reports whether a shot fires immediately.
    ///
    /// Pressing an already held trigger has no effect.
    pub fn press(&mut self) -> bool {
        if self.held {
            return false;
        }
        self.held = true;
        self.last_shot_at = self.timers.now();
        true
    }

    /// Releases the trigger and drops any pending automatic shot.
    pub fn release(&mut self) {
        self.held = false;
        self.disarm();
    }

    /// Schedules the next automatic shot `interval` after the most recent one.
    ///
    /// A shot whose deadline already passed fires on the next advance.
    pub fn rearm(&mut self, interval: Duration) {
        self.disarm();
        if self.held {
            let deadline = self.last_shot_at.saturating_add(interval);
            self.repeat = Some(self.timers.schedule_at(deadline, ()));
        }
    }

    /// Advances the cadence clock and reports whether an automatic shot is due.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.due.clear();
        self.timers.advance(dt, &mut self.due);

        let Some(handle) = self.repeat else {
            return false;
        };
        let Some(due) = self.due.iter().find(|due| due.handle == handle) else {
            return false;
        };

        self.last_shot_at = due.deadline;
        self.repeat = None;
        self.held
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.repeat.take() {
            let _ = self.timers.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn hold_for(control: &mut FireControl, interval: Duration, frames: u32) -> u32 {
        let mut shots = 0;
        if control.press() {
            shots += 1;
            control.rearm(interval);
        }
        for _ in 0..frames {
            if control.advance(FRAME) {
                shots += 1;
                control.rearm(interval);
            }
        }
        shots
    }

    #[test]
    fn held_trigger_repeats_at_the_interval() {
        let mut control = FireControl::new();
        // 64 frames of 16 ms cover 1024 ms: shots at 0, 500 and 1000 ms.
        assert_eq!(hold_for(&mut control, Duration::from_millis(500), 64), 3);
    }

    #[test]
    fn release_stops_the_repeat() {
        let mut control = FireControl::new();
        let _ = hold_for(&mut control, Duration::from_millis(300), 10);
        control.release();
        assert!(!control.is_armed());
        for _ in 0..100 {
            assert!(!control.advance(FRAME), "released trigger must stay silent");
        }
    }

    #[test]
    fn repeated_press_does_not_double_fire() {
        let mut control = FireControl::new();
        assert!(control.press());
        assert!(!control.press());
        control.release();
        assert!(control.press());
    }

    #[test]
    fn long_frames_fire_at_most_once() {
        let mut control = FireControl::new();
        assert!(control.press());
        control.rearm(Duration::from_millis(100));

        assert!(control.advance(Duration::from_millis(450)));
        control.rearm(Duration::from_millis(100));
        assert!(control.advance(Duration::from_millis(1)));
    }
}
