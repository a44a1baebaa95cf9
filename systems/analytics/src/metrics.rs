use raycast_arena_core::{
    HudSnapshot, PlayerSnapshot, RoundSnapshot, SessionSummary, WeaponSnapshot,
};

/// Percentage of fired shots that struck at least one hostile.
///
/// Sessions without a single shot report zero rather than dividing by zero.
#[must_use]
pub fn accuracy_percent(shots_hit: u32, shots_fired: u32) -> f32 {
    if shots_fired == 0 {
        return 0.0;
    }
    shots_hit as f32 / shots_fired as f32 * 100.0
}

/// Builds the record handed to persistence once a session ends.
#[must_use]
pub fn summarize(round: &RoundSnapshot) -> SessionSummary {
    SessionSummary {
        score: round.score,
        waves_survived: round.rounds_survived,
        kills: round.kills,
        shots_fired: round.shots_fired,
        shots_hit: round.shots_hit,
        accuracy_percent: accuracy_percent(round.shots_hit, round.shots_fired),
    }
}

/// Collects everything the heads-up display shows for the current frame.
#[must_use]
pub fn hud_snapshot(
    player: &PlayerSnapshot,
    weapon: &WeaponSnapshot,
    round: &RoundSnapshot,
    paused: bool,
) -> HudSnapshot {
    HudSnapshot {
        health: player.health,
        wave: round.display_wave(),
        streak: round.streak,
        ammo: weapon.ammo,
        weapon_name: weapon.kind.spec().name,
        score: round.score,
        phase: round.phase,
        status: round.status,
        paused,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_without_shots_is_zero() {
        assert_eq!(accuracy_percent(0, 0), 0.0);
    }

    #[test]
    fn accuracy_is_a_percentage() {
        assert!((accuracy_percent(3, 4) - 75.0).abs() < 1e-4);
        assert!((accuracy_percent(1, 3) - 33.333_33).abs() < 1e-3);
    }
}
