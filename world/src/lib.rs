#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Raycast Arena.

mod collision;

use std::time::Duration;

use raycast_arena_core::{
    AmmoCount, Command, Event, GridMap, Heading, HostileId, PickupEffect, PickupId,
    RoundPhase, SessionStatus, ShotTrace, StreakMultiplier, Strike, WeaponKind, WorldPoint,
    PLAYER_MAX_HEALTH, WELCOME_BANNER,
};

/// Represents the authoritative Raycast Arena world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    map: GridMap,
    player: Player,
    hostiles: Vec<Hostile>,
    pickups: Vec<Pickup>,
    arsenal: Arsenal,
    round: RoundState,
    last_shot: Option<ShotTrace>,
    clock: Duration,
    next_hostile: u32,
    next_pickup: u32,
}

impl World {
    /// Creates an empty world; an arena must be loaded before play.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            map: GridMap::empty(),
            player: Player::spawn(WorldPoint::default(), Heading::default()),
            hostiles: Vec::new(),
            pickups: Vec::new(),
            arsenal: Arsenal::issue(),
            round: RoundState::fresh(),
            last_shot: None,
            clock: Duration::ZERO,
            next_hostile: 0,
            next_pickup: 0,
        }
    }

    fn load_arena(&mut self, map: GridMap, player_start: WorldPoint, player_heading: Heading) {
        self.map = map;
        self.player = Player::spawn(player_start, player_heading);
        self.hostiles.clear();
        self.pickups.clear();
        self.arsenal = Arsenal::issue();
        self.round = RoundState::fresh();
        self.last_shot = None;
        self.clock = Duration::ZERO;
        self.next_hostile = 0;
        self.next_pickup = 0;
    }

    fn hostile_index(&self, hostile: HostileId) -> Option<usize> {
        self.hostiles.iter().position(|entry| entry.id == hostile)
    }

    fn live_pickup_mut(&mut self, pickup: PickupId) -> Option<&mut Pickup> {
        self.pickups
            .iter_mut()
            .find(|entry| entry.id == pickup && !entry.collected)
    }

    fn allocate_hostile_id(&mut self) -> HostileId {
        let id = HostileId::new(self.next_hostile);
        self.next_hostile = self.next_hostile.wrapping_add(1);
        id
    }

    fn allocate_pickup_id(&mut self) -> PickupId {
        let id = PickupId::new(self.next_pickup);
        self.next_pickup = self.next_pickup.wrapping_add(1);
        id
    }

    fn move_hostile(&mut self, hostile: HostileId, dx: f32, dy: f32, out_events: &mut Vec<Event>) {
        let Some(index) = self.hostile_index(hostile) else {
            return;
        };

        let from = self.hostiles[index].position;
        let hostiles = &self.hostiles;
        let pickups = &self.pickups;
        let to = collision::slide(&self.map, from, dx, dy, |candidate| {
            let others = hostiles
                .iter()
                .filter(|other| other.id != hostile)
                .map(|other| other.position);
            let resting = pickups
                .iter()
                .filter(|pickup| !pickup.collected)
                .map(|pickup| pickup.position);
            collision::keeps_separation(candidate, others.chain(resting))
        });

        if to != from {
            self.hostiles[index].position = to;
            out_events.push(Event::HostileMoved { hostile, from, to });
        }
    }

    fn resolve_discharge(
        &mut self,
        weapon: WeaponKind,
        strikes: Vec<Strike>,
        trace_end: WorldPoint,
        out_events: &mut Vec<Event>,
    ) {
        if weapon != self.arsenal.equipped {
            return;
        }

        if !self.arsenal.ammo(weapon).can_fire() {
            out_events.push(Event::OutOfAmmo { weapon });
            return;
        }

        self.arsenal.spend(weapon);
        self.round.shots_fired = self.round.shots_fired.saturating_add(1);

        let mut hit = false;
        for strike in strikes {
            let Some(index) = self.hostile_index(strike.hostile) else {
                continue;
            };
            hit = true;

            let target = &mut self.hostiles[index];
            target.health -= strike.damage;
            target.last_hit = Some(self.clock);
            out_events.push(Event::HostileHit {
                hostile: strike.hostile,
                damage: strike.damage,
                remaining: target.health.max(0.0),
            });

            if target.health <= 0.0 {
                let _ = self.hostiles.remove(index);
                let score = self.round.streak.kill_score();
                self.round.score = self.round.score.saturating_add(score);
                self.round.kills = self.round.kills.saturating_add(1);
                self.round.streak = self.round.streak.bumped();
                out_events.push(Event::HostileKilled {
                    hostile: strike.hostile,
                    score,
                });
            }
        }

        let spec = weapon.spec();
        if hit {
            self.round.shots_hit = self.round.shots_hit.saturating_add(1);
            if let Some(acceleration) = spec.acceleration {
                self.arsenal.fire_interval = acceleration.accelerate(self.arsenal.fire_interval);
            }
        } else {
            self.round.streak = StreakMultiplier::BASE;
            self.arsenal.fire_interval = spec.fire_interval;
        }

        self.last_shot = Some(ShotTrace {
            end: trace_end,
            fired_at: self.clock,
        });
        out_events.push(Event::ShotFired { weapon, hit });
    }

    fn apply_pickup(&mut self, effect: PickupEffect) {
        match effect {
            PickupEffect::Heal { amount } => {
                self.player.health = self
                    .player
                    .health
                    .saturating_add(amount)
                    .min(PLAYER_MAX_HEALTH);
            }
            PickupEffect::Resupply { rounds } => self.arsenal.resupply(rounds),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadArena {
            map,
            player_start,
            player_heading,
        } => {
            let (columns, rows) = (map.columns(), map.rows());
            world.load_arena(map, player_start, player_heading);
            out_events.push(Event::ArenaLoaded { columns, rows });
            return;
        }
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            world.pickups.retain(|pickup| !pickup.collected);
            out_events.push(Event::TimeAdvanced { dt });
            return;
        }
        _ => {}
    }

    if world.round.status == SessionStatus::Over {
        return;
    }

    let active = world.round.phase == RoundPhase::Active;

    match command {
        Command::LoadArena { .. } | Command::Tick { .. } => {}
        Command::MovePlayer { dx, dy } => {
            let from = world.player.position;
            let to = collision::slide(&world.map, from, dx, dy, |_| true);
            if to != from {
                world.player.position = to;
                out_events.push(Event::PlayerMoved { from, to });
            }
        }
        Command::TurnPlayer { radians } => {
            if radians != 0.0 && radians.is_finite() {
                world.player.heading = world.player.heading.rotated(radians);
                out_events.push(Event::PlayerTurned {
                    heading: world.player.heading,
                });
            }
        }
        Command::MoveHostile { hostile, dx, dy } => {
            if active {
                world.move_hostile(hostile, dx, dy, out_events);
            }
        }
        Command::HostileAttack { hostile, damage } => {
            let Some(index) = world.hostile_index(hostile) else {
                return;
            };
            if !active {
                return;
            }

            world.hostiles[index].last_attack = Some(world.clock);
            world.player.health = world.player.health.saturating_sub(damage);
            out_events.push(Event::PlayerDamaged {
                amount: damage,
                remaining: world.player.health,
            });

            if world.player.health == 0 {
                world.round.status = SessionStatus::Over;
                out_events.push(Event::PlayerDied);
            }
        }
        Command::SelectWeapon { weapon } => {
            world.arsenal.equip(weapon);
            out_events.push(Event::WeaponSelected { weapon });
        }
        Command::Reload => {
            let weapon = world.arsenal.equipped;
            if let Some(rounds) = world.arsenal.reload() {
                out_events.push(Event::Reloaded { weapon, rounds });
            }
        }
        Command::PullTrigger => {
            world.arsenal.fire_interval = world.arsenal.equipped.spec().fire_interval;
        }
        Command::DryFire { weapon } => {
            if active {
                out_events.push(Event::OutOfAmmo { weapon });
            }
        }
        Command::Discharge {
            weapon,
            strikes,
            trace_end,
        } => {
            if active {
                world.resolve_discharge(weapon, strikes, trace_end, out_events);
            }
        }
        Command::SpawnHostile { cell, health } => {
            if world.round.phase != RoundPhase::Spawning {
                return;
            }
            if !world.map.tile_at_cell(cell).is_walkable() {
                return;
            }

            let hostile = world.allocate_hostile_id();
            let position = cell.center();
            world.hostiles.push(Hostile {
                id: hostile,
                position,
                health: health as f32,
                max_health: health,
                last_attack: None,
                last_hit: None,
            });
            out_events.push(Event::HostileSpawned {
                hostile,
                position,
                health,
            });
        }
        Command::SpawnPickup { cell, effect } => {
            if !world.map.tile_at_cell(cell).is_walkable() {
                return;
            }

            let pickup = world.allocate_pickup_id();
            let position = cell.center();
            world.pickups.push(Pickup {
                id: pickup,
                position,
                effect,
                collected: false,
            });
            out_events.push(Event::PickupSpawned {
                pickup,
                position,
                effect,
            });
        }
        Command::CollectPickup { pickup } => {
            let Some(entry) = world.live_pickup_mut(pickup) else {
                return;
            };
            entry.collected = true;
            let effect = entry.effect;
            world.apply_pickup(effect);
            out_events.push(Event::PickupCollected { pickup, effect });
        }
        Command::BeginCountdown { ticks } => {
            if !active || !world.hostiles.is_empty() {
                return;
            }

            let upcoming_wave = world.round.wave.saturating_add(1);
            if ticks == 0 {
                world.round.phase = RoundPhase::Spawning;
                out_events.push(Event::SpawningStarted {
                    wave: upcoming_wave,
                });
                return;
            }

            world.round.phase = RoundPhase::Countdown { remaining: ticks };
            out_events.push(Event::CountdownStarted {
                upcoming_wave,
                remaining: ticks,
            });
        }
        Command::CountdownTick => {
            let RoundPhase::Countdown { remaining } = world.round.phase else {
                return;
            };

            let remaining = remaining.saturating_sub(1);
            out_events.push(Event::CountdownAdvanced { remaining });
            if remaining == 0 {
                world.round.phase = RoundPhase::Spawning;
                out_events.push(Event::SpawningStarted {
                    wave: world.round.wave.saturating_add(1),
                });
            } else {
                world.round.phase = RoundPhase::Countdown { remaining };
            }
        }
        Command::CompleteSpawning => {
            if world.round.phase != RoundPhase::Spawning {
                return;
            }

            if world.round.wave > 0 {
                world.round.rounds_survived = world.round.rounds_survived.saturating_add(1);
            }
            world.round.wave = world.round.wave.saturating_add(1);
            world.round.streak = StreakMultiplier::BASE;
            world.round.phase = RoundPhase::Active;
            out_events.push(Event::WaveStarted {
                wave: world.round.wave,
                hostiles: u32::try_from(world.hostiles.len()).unwrap_or(u32::MAX),
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use raycast_arena_core::{
        AmmoCount, GridMap, HostileSnapshot, HostileView, PickupSnapshot, PickupView,
        PlayerSnapshot, RoundSnapshot, SessionStatus, ShotTrace, WeaponKind,
        WeaponSnapshot,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the arena map.
    #[must_use]
    pub fn map(world: &World) -> &GridMap {
        &world.map
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            heading: world.player.heading,
            health: world.player.health,
        }
    }

    /// Captures a read-only view of the live hostiles.
    #[must_use]
    pub fn hostile_view(world: &World) -> HostileView {
        HostileView::from_snapshots(
            world
                .hostiles
                .iter()
                .map(|hostile| HostileSnapshot {
                    id: hostile.id,
                    position: hostile.position,
                    health: hostile.health,
                    max_health: hostile.max_health,
                    last_attack: hostile.last_attack,
                    last_hit: hostile.last_hit,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the uncollected pickups.
    #[must_use]
    pub fn pickup_view(world: &World) -> PickupView {
        PickupView::from_snapshots(
            world
                .pickups
                .iter()
                .filter(|pickup| !pickup.collected)
                .map(|pickup| PickupSnapshot {
                    id: pickup.id,
                    position: pickup.position,
                    effect: pickup.effect,
                })
                .collect(),
        )
    }

    /// Captures the equipped weapon.
    #[must_use]
    pub fn weapon(world: &World) -> WeaponSnapshot {
        let kind = world.arsenal.equipped;
        WeaponSnapshot {
            kind,
            ammo: world.arsenal.ammo(kind),
            fire_interval: world.arsenal.fire_interval,
        }
    }

    /// Ammunition loaded in the provided weapon, equipped or not.
    #[must_use]
    pub fn ammo(world: &World, weapon: WeaponKind) -> AmmoCount {
        world.arsenal.ammo(weapon)
    }

    /// Captures the wave and scoring state.
    #[must_use]
    pub fn round(world: &World) -> RoundSnapshot {
        let round = &world.round;
        RoundSnapshot {
            wave: round.wave,
            rounds_survived: round.rounds_survived,
            kills: round.kills,
            shots_fired: round.shots_fired,
            shots_hit: round.shots_hit,
            score: round.score,
            streak: round.streak,
            phase: round.phase,
            status: round.status,
        }
    }

    /// Reports whether the session ended.
    #[must_use]
    pub fn is_over(world: &World) -> bool {
        world.round.status == SessionStatus::Over
    }

    /// Terminal point and time of the most recent discharge.
    #[must_use]
    pub fn last_shot(world: &World) -> Option<ShotTrace> {
        world.last_shot
    }

    /// Simulation time elapsed since the arena was loaded.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }
}

#[derive(Clone, Debug)]
struct Player {
    position: WorldPoint,
    heading: Heading,
    health: u32,
}

impl Player {
    fn spawn(position: WorldPoint, heading: Heading) -> Self {
        Self {
            position,
            heading,
            health: PLAYER_MAX_HEALTH,
        }
    }
}

#[derive(Clone, Debug)]
struct Hostile {
    id: HostileId,
    position: WorldPoint,
    health: f32,
    max_health: u32,
    last_attack: Option<Duration>,
    last_hit: Option<Duration>,
}

#[derive(Clone, Debug)]
struct Pickup {
    id: PickupId,
    position: WorldPoint,
    effect: PickupEffect,
    collected: bool,
}

#[derive(Clone, Debug)]
struct Arsenal {
    equipped: WeaponKind,
    ammo: [AmmoCount; 3],
    fire_interval: Duration,
}

impl Arsenal {
    fn issue() -> Self {
        Self {
            equipped: WeaponKind::Pistol,
            ammo: WeaponKind::ALL.map(|weapon| weapon.spec().full_ammo()),
            fire_interval: WeaponKind::Pistol.spec().fire_interval,
        }
    }

    fn ammo(&self, weapon: WeaponKind) -> AmmoCount {
        self.ammo[slot_index(weapon)]
    }

    fn equip(&mut self, weapon: WeaponKind) {
        self.equipped = weapon;
        self.fire_interval = weapon.spec().fire_interval;
    }

    fn spend(&mut self, weapon: WeaponKind) {
        let slot = &mut self.ammo[slot_index(weapon)];
        *slot = slot.spent();
    }

    fn reload(&mut self) -> Option<u32> {
        let capacity = self.equipped.spec().capacity?;
        let slot = &mut self.ammo[slot_index(self.equipped)];
        if *slot == AmmoCount::Rounds(capacity) {
            return None;
        }
        *slot = AmmoCount::Rounds(capacity);
        Some(capacity)
    }

    fn resupply(&mut self, rounds: u32) {
        let Some(capacity) = self.equipped.spec().capacity else {
            return;
        };
        let slot = &mut self.ammo[slot_index(self.equipped)];
        if let AmmoCount::Rounds(current) = *slot {
            *slot = AmmoCount::Rounds(current.saturating_add(rounds).min(capacity));
        }
    }
}

fn slot_index(weapon: WeaponKind) -> usize {
    match weapon {
        WeaponKind::Pistol => 0,
        WeaponKind::Shotgun => 1,
        WeaponKind::Rifle => 2,
    }
}

#[derive(Clone, Debug)]
struct RoundState {
    wave: u32,
    rounds_survived: u32,
    kills: u32,
    shots_fired: u32,
    shots_hit: u32,
    score: u64,
    streak: StreakMultiplier,
    phase: RoundPhase,
    status: SessionStatus,
}

impl RoundState {
    fn fresh() -> Self {
        Self {
            wave: 0,
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
}
