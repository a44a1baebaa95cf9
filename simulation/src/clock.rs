//! Conversion of presentation timestamps into simulation deltas.

use std::time::Duration;

/// Longest delta a single frame may advance the simulation by.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Turns monotonically increasing frame timestamps into bounded deltas.
///
/// The first timestamp after construction or [`FrameClock::suspend`] only
/// establishes a reference point and yields a zero delta, so time spent
/// paused never reaches the simulation.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    last: Option<Duration>,
    max_delta: Duration,
}

impl FrameClock {
    /// Creates a clock that clamps every delta to `max_delta`.
    #[must_use]
    pub const fn new(max_delta: Duration) -> Self {
        Self {
            last: None,
            max_delta,
        }
    }

    /// Records `timestamp` and returns the delta since the previous one.
    pub fn tick(&mut self, timestamp: Duration) -> Duration {
        let delta = match self.last {
            Some(previous) => timestamp.saturating_sub(previous).min(self.max_delta),
            None => Duration::ZERO,
        };
        self.last = Some(timestamp);
        delta
    }

    /// Forgets the reference timestamp.
    pub fn suspend(&mut self) {
        self.last = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DELTA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn first_timestamp_yields_no_time() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(ms(5_000)), Duration::ZERO);
        assert_eq!(clock.tick(ms(5_016)), ms(16));
    }

    #[test]
    fn suspension_bridges_the_gap() {
        let mut clock = FrameClock::default();
        let _ = clock.tick(ms(0));
        let _ = clock.tick(ms(16));
        clock.suspend();
        assert_eq!(clock.tick(ms(60_000)), Duration::ZERO);
        assert_eq!(clock.tick(ms(60_020)), ms(20));
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut clock = FrameClock::default();
        let _ = clock.tick(ms(0));
        assert_eq!(clock.tick(ms(2_000)), MAX_FRAME_DELTA);
    }

    #[test]
    fn timestamps_running_backwards_yield_no_time() {
        let mut clock = FrameClock::default();
        let _ = clock.tick(ms(100));
        assert_eq!(clock.tick(ms(50)), Duration::ZERO);
    }
}
