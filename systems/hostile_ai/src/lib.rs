#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that steers hostiles toward the player and resolves melee.
//!
//! Hostiles have no pathfinding. Each one walks straight at the player and
//! relies on the world's axis-separated collision to slide around simple
//! obstructions, so concave wall geometry can stall it.

use std::time::Duration;

use raycast_arena_core::{
    Command, Event, HostileSnapshot, HostileView, PlayerSnapshot, RoundPhase, RoundSnapshot,
    SessionStatus,
};

/// Configuration parameters required to construct the hostile AI system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    speed: f32,
    melee_range: f32,
    cooldown: Duration,
    damage: u32,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// `speed` is expressed in tiles per second. A hostile closer to the
    /// player than `melee_range` stops walking and attacks for `damage`
    /// whenever strictly more than `cooldown` elapsed since its last attack.
    #[must_use]
    pub const fn new(speed: f32, melee_range: f32, cooldown: Duration, damage: u32) -> Self {
        Self {
            speed,
            melee_range,
            cooldown,
            damage,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(1.2, 0.5, Duration::from_millis(500), 25)
    }
}

/// Pursuit and melee behaviour shared by every hostile.
#[derive(Debug)]
pub struct HostileAi {
    config: Config,
}

impl HostileAi {
    /// Creates a new hostile AI system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Consumes events and immutable views to emit movement and attack commands.
    ///
    /// `now` is the world clock after the tick being handled.
    pub fn handle(
        &mut self,
        events: &[Event],
        round: &RoundSnapshot,
        player: &PlayerSnapshot,
        hostiles: &HostileView,
        now: Duration,
        out: &mut Vec<Command>,
    ) {
        if round.status != SessionStatus::Playing || round.phase != RoundPhase::Active {
            return;
        }

        let elapsed: Duration = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .sum();
        if elapsed.is_zero() {
            return;
        }

        for hostile in hostiles.iter() {
            let distance = hostile.position.distance_to(player.position);
            if distance > self.config.melee_range {
                let step = self.config.speed * elapsed.as_secs_f32();
                let dx = (player.position.x() - hostile.position.x()) / distance * step;
                let dy = (player.position.y() - hostile.position.y()) / distance * step;
                out.push(Command::MoveHostile {
                    hostile: hostile.id,
                    dx,
                    dy,
                });
            } else if self.cooled_down(hostile, now) {
                out.push(Command::HostileAttack {
                    hostile: hostile.id,
                    damage: self.config.damage,
                });
            }
        }
    }

    fn cooled_down(&self, hostile: &HostileSnapshot, now: Duration) -> bool {
        match hostile.last_attack {
            None => true,
            Some(last) => now.saturating_sub(last) > self.config.cooldown,
        }
    }
}

impl Default for HostileAi {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raycast_arena_core::{HostileId, StreakMultiplier, WorldPoint};

    fn active_round() -> RoundSnapshot {
        RoundSnapshot {
            wave: 1,
            rounds_survived: 0,
            kills: 0,
            shots_fired: 0,
            shots_hit: 0,
            score: 0,
            streak: StreakMultiplier::BASE,
            phase: RoundPhase::Active,
            status: SessionStatus::Playing,
        }
    }

    fn hostile_at(x: f32, y: f32, last_attack: Option<Duration>) -> HostileView {
        HostileView::from_snapshots(vec![HostileSnapshot {
            id: HostileId::new(0),
            position: WorldPoint::new(x, y),
            health: 50.0,
            max_health: 50,
            last_attack,
            last_hit: None,
        }])
    }

    fn player_at(x: f32, y: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            position: WorldPoint::new(x, y),
            heading: Default::default(),
            health: 100,
        }
    }

    fn tick(millis: u64) -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }]
    }

    #[test]
    fn distant_hostiles_walk_straight_at_the_player() {
        let mut ai = HostileAi::default();
        let mut out = Vec::new();
        ai.handle(
            &tick(500),
            &active_round(),
            &player_at(5.0, 2.0),
            &hostile_at(2.0, 2.0, None),
            Duration::from_millis(500),
            &mut out,
        );

        let [Command::MoveHostile { dx, dy, .. }] = out.as_slice() else {
            panic!("expected a single move, got {out:?}");
        };
        assert!((dx - 0.6).abs() < 1e-5, "moved {dx} tiles");
        assert_eq!(*dy, 0.0);
    }

    #[test]
    fn cooldown_must_strictly_elapse() {
        let mut ai = HostileAi::default();
        let last = Some(Duration::from_millis(1_000));
        let mut out = Vec::new();

        ai.handle(
            &tick(16),
            &active_round(),
            &player_at(2.25, 2.0),
            &hostile_at(2.0, 2.0, last),
            Duration::from_millis(1_500),
            &mut out,
        );
        assert!(out.is_empty(), "exactly 500 ms is still cooling down");

        ai.handle(
            &tick(16),
            &active_round(),
            &player_at(2.25, 2.0),
            &hostile_at(2.0, 2.0, last),
            Duration::from_millis(1_516),
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::HostileAttack {
                hostile: HostileId::new(0),
                damage: 25
            }]
        );
    }

    #[test]
    fn countdown_freezes_hostiles() {
        let mut ai = HostileAi::default();
        let mut round = active_round();
        round.phase = RoundPhase::Countdown { remaining: 2 };
        let mut out = Vec::new();
        ai.handle(
            &tick(16),
            &round,
            &player_at(5.0, 2.0),
            &hostile_at(2.0, 2.0, None),
            Duration::from_millis(16),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
