#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hit-scan combat resolution and trigger handling.
//!
//! [`Combat`] turns a single firing attempt into either a
//! [`Command::DryFire`] or a [`Command::Discharge`] describing every hostile
//! struck by the weapon's rays. The world applies ammunition cost, damage,
//! kills and streak bookkeeping. [`FireControl`] decides when firing attempts
//! happen while the trigger is held.

mod fire_control;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use raycast_arena_core::{
    Command, FirePattern, GridMap, HostileId, HostileView, PlayerSnapshot, RayProfile,
    StreakMultiplier, Strike, Tile, WeaponSnapshot, WorldPoint,
};

pub use fire_control::FireControl;

/// Distance from a ray sample within which a hostile counts as struck.
pub const HIT_RADIUS: f32 = 0.3;

/// Configuration parameters required to construct the combat system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the seed that drives pellet spread.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that resolves firing attempts into world commands.
#[derive(Debug)]
pub struct Combat {
    rng: ChaCha8Rng,
    targets: Vec<Target>,
    struck_by_ray: Vec<HostileId>,
}

impl Combat {
    /// Creates a new combat system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            targets: Vec::new(),
            struck_by_ray: Vec::new(),
        }
    }

    /// Resolves one firing attempt of the equipped weapon.
    ///
    /// Callers only invoke this during active play. Every ray of the discharge
    /// is traced before the outcome is reported, so a hostile killed by an
    /// earlier pellet can never be struck by a later one.
    pub fn resolve(
        &mut self,
        weapon: &WeaponSnapshot,
        player: &PlayerSnapshot,
        streak: StreakMultiplier,
        map: &GridMap,
        hostiles: &HostileView,
    ) -> Command {
        if !weapon.ammo.can_fire() {
            return Command::DryFire {
                weapon: weapon.kind,
            };
        }

        let spec = weapon.kind.spec();
        let damage = spec.damage * streak.value();
        let facing = player.heading.radians();

        self.targets.clear();
        self.targets.extend(hostiles.iter().map(|hostile| Target {
            id: hostile.id,
            position: hostile.position,
            health: hostile.health,
        }));

        let (rays, half_spread, penetrating) = match spec.pattern {
            FirePattern::Single => (1, 0.0, false),
            FirePattern::Spread {
                pellets,
                half_spread,
            } => (pellets.max(1), half_spread, false),
            FirePattern::Penetrating => (1, 0.0, true),
        };

        let mut strikes = Vec::new();
        let mut trace_end = player.position;
        for ray in 0..rays {
            let angle = if half_spread > 0.0 {
                facing + self.rng.gen_range(-half_spread..=half_spread)
            } else {
                facing
            };

            let end = self.trace(
                map,
                player.position,
                angle,
                spec.ray,
                damage,
                penetrating,
                &mut strikes,
            );
            if ray == 0 {
                trace_end = end;
            }
        }

        Command::Discharge {
            weapon: weapon.kind,
            strikes,
            trace_end,
        }
    }

    /// Steps a single ray outward, recording strikes, and returns where it stopped.
    #[allow(clippy::too_many_arguments)]
    fn trace(
        &mut self,
        map: &GridMap,
        origin: WorldPoint,
        angle: f32,
        profile: RayProfile,
        damage: f32,
        penetrating: bool,
        strikes: &mut Vec<Strike>,
    ) -> WorldPoint {
        self.struck_by_ray.clear();

        let mut end = origin;
        let mut step = 0_u32;
        loop {
            let distance = step as f32 * profile.step;
            if distance >= profile.range || profile.step <= 0.0 {
                break;
            }
            step += 1;

            let sample = origin.along(angle, distance);
            end = sample;
            if map.tile_at(sample) == Tile::Wall {
                break;
            }

            for target in self.targets.iter_mut() {
                if target.health <= 0.0 || self.struck_by_ray.contains(&target.id) {
                    continue;
                }
                if sample.distance_to(target.position) >= HIT_RADIUS {
                    continue;
                }

                target.health -= damage;
                strikes.push(Strike::new(target.id, damage));
                self.struck_by_ray.push(target.id);
                if !penetrating {
                    return sample;
                }
            }
        }

        end
    }
}

#[derive(Clone, Copy, Debug)]
struct Target {
    id: HostileId,
    position: WorldPoint,
    health: f32,
}
