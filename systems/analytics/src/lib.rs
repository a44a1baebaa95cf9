#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session analytics: the heads-up display record and the end-of-session summary.

mod metrics;

use raycast_arena_core::{Event, RoundSnapshot, SessionSummary};

pub use metrics::{accuracy_percent, hud_snapshot, summarize};

/// Pure analytics system that publishes the session summary when the player dies.
#[derive(Debug, Default)]
pub struct Analytics {
    last_summary: Option<SessionSummary>,
}

impl Analytics {
    /// Creates a new analytics system that has not published anything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the summary published for the current session, if it ended.
    #[must_use]
    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    /// Forgets the published summary so a restarted session can publish again.
    pub fn reset(&mut self) {
        self.last_summary = None;
    }

    /// Consumes world events and publishes the summary exactly once per session.
    ///
    /// `round` must reflect the world after `events` were produced.
    pub fn handle(&mut self, events: &[Event], round: &RoundSnapshot, out: &mut Vec<SessionSummary>) {
        if self.last_summary.is_some() {
            return;
        }
        if !events.iter().any(|event| matches!(event, Event::PlayerDied)) {
            return;
        }

        let summary = summarize(round);
        self.last_summary = Some(summary);
        out.push(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raycast_arena_core::{RoundPhase, SessionStatus, StreakMultiplier};

    fn finished_round() -> RoundSnapshot {
        RoundSnapshot {
            wave: 4,
            rounds_survived: 3,
            kills: 30,
            shots_fired: 40,
            shots_hit: 30,
            score: 3_450,
            streak: StreakMultiplier::from_tenths(13),
            phase: RoundPhase::Active,
            status: SessionStatus::Over,
        }
    }

    #[test]
    fn summary_is_published_once() {
        let mut analytics = Analytics::new();
        let mut out = Vec::new();

        analytics.handle(&[Event::PlayerDied], &finished_round(), &mut out);
        analytics.handle(&[Event::PlayerDied], &finished_round(), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].waves_survived, 3);
        assert!((out[0].accuracy_percent - 75.0).abs() < 1e-4);

        analytics.reset();
        assert!(analytics.last_summary().is_none());
        analytics.handle(&[Event::PlayerDied], &finished_round(), &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn living_players_publish_nothing() {
        let mut analytics = Analytics::new();
        let mut out = Vec::new();
        analytics.handle(&[], &finished_round(), &mut out);
        assert!(out.is_empty());
        assert!(analytics.last_summary().is_none());
    }
}
