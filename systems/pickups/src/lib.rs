#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Supply drops and pickup collection.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use raycast_arena_core::{
    CellCoord, Command, Event, GridMap, HostileView, PickupEffect, PickupView, PlayerSnapshot,
    RoundPhase, RoundSnapshot, SessionStatus,
};

/// Configuration parameters required to construct the pickups system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    drop_chance: f64,
    heal_amount: u32,
    resupply_rounds: u32,
    min_drop_distance: f32,
    collection_radius: f32,
    drop_attempts: u32,
    rng_seed: u64,
}

impl Config {
    /// Default drop tuning driven by the provided seed.
    ///
    /// Every active tick rolls a 1% chance to drop either a 25 point health
    /// pack or a 10 round ammo pack more than three tiles from the player.
    /// Pickups are collected within half a tile.
    #[must_use]
    pub const fn with_seed(rng_seed: u64) -> Self {
        Self {
            drop_chance: 0.01,
            heal_amount: 25,
            resupply_rounds: 10,
            min_drop_distance: 3.0,
            collection_radius: 0.5,
            drop_attempts: 100,
            rng_seed,
        }
    }

    /// Replaces the per-tick drop probability, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_drop_chance(mut self, drop_chance: f64) -> Self {
        self.drop_chance = if drop_chance.is_finite() {
            drop_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }
}

/// Pure system that drops supplies and detects their collection.
#[derive(Debug)]
pub struct Pickups {
    config: Config,
    rng: ChaCha8Rng,
}

impl Pickups {
    /// Creates a new pickups system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and immutable views to emit drop and collection commands.
    #[allow(clippy::too_many_arguments)]
    pub fn handle(
        &mut self,
        events: &[Event],
        round: &RoundSnapshot,
        player: &PlayerSnapshot,
        hostiles: &HostileView,
        pickups: &PickupView,
        map: &GridMap,
        out: &mut Vec<Command>,
    ) {
        if round.status != SessionStatus::Playing {
            return;
        }

        let ticks = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count();
        if ticks == 0 {
            return;
        }

        out.extend(
            pickups
                .iter()
                .filter(|pickup| {
                    pickup.position.distance_to(player.position) < self.config.collection_radius
                })
                .map(|pickup| Command::CollectPickup { pickup: pickup.id }),
        );

        if round.phase != RoundPhase::Active {
            return;
        }

        let mut occupied: Vec<CellCoord> = hostiles
            .iter()
            .filter_map(|hostile| hostile.position.cell())
            .chain(pickups.iter().filter_map(|pickup| pickup.position.cell()))
            .collect();

        for _ in 0..ticks {
            if !self.rng.gen_bool(self.config.drop_chance) {
                continue;
            }

            let effect = if self.rng.gen_bool(0.5) {
                PickupEffect::Heal {
                    amount: self.config.heal_amount,
                }
            } else {
                PickupEffect::Resupply {
                    rounds: self.config.resupply_rounds,
                }
            };

            if let Some(cell) = self.sample_cell(player, map, &occupied) {
                occupied.push(cell);
                out.push(Command::SpawnPickup { cell, effect });
            }
        }
    }

    fn sample_cell(
        &mut self,
        player: &PlayerSnapshot,
        map: &GridMap,
        occupied: &[CellCoord],
    ) -> Option<CellCoord> {
        if map.columns() < 3 || map.rows() < 3 {
            return None;
        }

        for _ in 0..self.config.drop_attempts {
            let cell = CellCoord::new(
                self.rng.gen_range(1..map.columns() - 1),
                self.rng.gen_range(1..map.rows() - 1),
            );
            if !map.tile_at_cell(cell).is_walkable() || occupied.contains(&cell) {
                continue;
            }
            if cell.center().distance_to(player.position) > self.config.min_drop_distance {
                return Some(cell);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raycast_arena_core::{PickupId, PickupSnapshot, StreakMultiplier, WorldPoint};
    use std::time::Duration;

    fn round(phase: RoundPhase) -> RoundSnapshot {
        RoundSnapshot {
            wave: 1,
            rounds_survived: 0,
            kills: 0,
            shots_fired: 0,
            shots_hit: 0,
            score: 0,
            streak: StreakMultiplier::BASE,
            phase,
            status: SessionStatus::Playing,
        }
    }

    fn player_at(x: f32, y: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            position: WorldPoint::new(x, y),
            heading: Default::default(),
            health: 60,
        }
    }

    fn tick() -> [Event; 1] {
        [Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }]
    }

    fn map() -> GridMap {
        GridMap::parse(raycast_arena_core::DEFAULT_ARENA).expect("built-in arena parses")
    }

    #[test]
    fn nearby_pickups_are_collected_in_any_phase() {
        let mut system = Pickups::new(Config::with_seed(1).with_drop_chance(0.0));
        let pickups = PickupView::from_snapshots(vec![
            PickupSnapshot {
                id: PickupId::new(0),
                position: WorldPoint::new(3.25, 3.0),
                effect: PickupEffect::Heal { amount: 25 },
            },
            PickupSnapshot {
                id: PickupId::new(1),
                position: WorldPoint::new(3.5, 3.0),
                effect: PickupEffect::Resupply { rounds: 10 },
            },
        ]);

        let mut out = Vec::new();
        system.handle(
            &tick(),
            &round(RoundPhase::Countdown { remaining: 1 }),
            &player_at(3.0, 3.0),
            &HostileView::default(),
            &pickups,
            &map(),
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::CollectPickup {
                pickup: PickupId::new(0)
            }],
            "the pickup exactly half a tile away stays on the floor"
        );
    }

    #[test]
    fn certain_drops_land_far_from_the_player() {
        let mut system = Pickups::new(Config::with_seed(5).with_drop_chance(1.0));
        let player = player_at(3.0, 3.0);
        let mut cells = Vec::new();
        for _ in 0..50 {
            let mut out = Vec::new();
            system.handle(
                &tick(),
                &round(RoundPhase::Active),
                &player,
                &HostileView::default(),
                &PickupView::default(),
                &map(),
                &mut out,
            );
            for command in out {
                let Command::SpawnPickup { cell, .. } = command else {
                    panic!("only drops are expected");
                };
                assert!(cell.center().distance_to(player.position) > 3.0);
                assert!(map().tile_at_cell(cell).is_walkable());
                cells.push(cell);
            }
        }
        assert_eq!(cells.len(), 50);
    }

    #[test]
    fn no_drops_outside_active_play() {
        let mut system = Pickups::new(Config::with_seed(5).with_drop_chance(1.0));
        let mut out = Vec::new();
        system.handle(
            &tick(),
            &round(RoundPhase::Spawning),
            &player_at(3.0, 3.0),
            &HostileView::default(),
            &PickupView::default(),
            &map(),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
