#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Raycast Arena engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! read immutable snapshots, and respond exclusively with new command batches.

mod arsenal;
mod map;

use std::{
    f32::consts::{PI, TAU},
    time::Duration,
};

use serde::{Deserialize, Serialize};

pub use arsenal::{
    AmmoCount, FireAcceleration, FirePattern, RayProfile, StreakMultiplier, WeaponKind, WeaponSpec,
};
pub use map::{GridMap, MapError, Tile, DEFAULT_ARENA};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Raycast Arena.";

/// Health the player starts with and can never heal beyond.
pub const PLAYER_MAX_HEALTH: u32 = 100;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the arena map and resets every piece of session state.
    LoadArena {
        /// Tile layout the session is played on.
        map: GridMap,
        /// Position the player starts from.
        player_start: WorldPoint,
        /// Facing the player starts with.
        player_heading: Heading,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player translate by the provided displacement.
    MovePlayer {
        /// Displacement along the column axis measured in tiles.
        dx: f32,
        /// Displacement along the row axis measured in tiles.
        dy: f32,
    },
    /// Requests that the player rotate by the provided angle.
    TurnPlayer {
        /// Signed rotation expressed in radians.
        radians: f32,
    },
    /// Requests that a hostile translate by the provided displacement.
    MoveHostile {
        /// Identifier of the hostile attempting to move.
        hostile: HostileId,
        /// Displacement along the column axis measured in tiles.
        dx: f32,
        /// Displacement along the row axis measured in tiles.
        dy: f32,
    },
    /// Reports that a hostile landed a melee attack on the player.
    HostileAttack {
        /// Identifier of the attacking hostile.
        hostile: HostileId,
        /// Health removed from the player.
        damage: u32,
    },
    /// Requests that the player equip another weapon.
    SelectWeapon {
        /// Weapon to equip.
        weapon: WeaponKind,
    },
    /// Requests that the equipped weapon be refilled.
    Reload,
    /// Signals a fresh trigger press, restoring the base fire interval.
    PullTrigger,
    /// Reports a firing attempt rejected because the weapon is empty.
    DryFire {
        /// Weapon that failed to fire.
        weapon: WeaponKind,
    },
    /// Applies the resolved outcome of a single weapon discharge.
    Discharge {
        /// Weapon that produced the discharge.
        weapon: WeaponKind,
        /// Hostile strikes in the order the rays produced them.
        strikes: Vec<Strike>,
        /// Terminal point of the first ray, used for the shot trace.
        trace_end: WorldPoint,
    },
    /// Requests that a hostile be created centred in the provided cell.
    SpawnHostile {
        /// Cell hosting the new hostile.
        cell: CellCoord,
        /// Health assigned to the hostile.
        health: u32,
    },
    /// Requests that a pickup be created centred in the provided cell.
    SpawnPickup {
        /// Cell hosting the new pickup.
        cell: CellCoord,
        /// Effect granted when the pickup is collected.
        effect: PickupEffect,
    },
    /// Requests that the player collect the provided pickup.
    CollectPickup {
        /// Identifier of the pickup being collected.
        pickup: PickupId,
    },
    /// Requests the transition from active play into the between-wave countdown.
    BeginCountdown {
        /// Number of one-second ticks the countdown lasts.
        ticks: u32,
    },
    /// Advances the countdown by one tick.
    CountdownTick,
    /// Reports that the wave director finished spawning the next wave.
    CompleteSpawning,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new arena was loaded and the session reset.
    ArenaLoaded {
        /// Number of tile columns in the arena.
        columns: u32,
        /// Number of tile rows in the arena.
        rows: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player changed position.
    PlayerMoved {
        /// Position before the move.
        from: WorldPoint,
        /// Position after the move.
        to: WorldPoint,
    },
    /// Confirms that the player changed facing.
    PlayerTurned {
        /// Facing after the rotation.
        heading: Heading,
    },
    /// Confirms that a hostile changed position.
    HostileMoved {
        /// Identifier of the hostile that moved.
        hostile: HostileId,
        /// Position before the move.
        from: WorldPoint,
        /// Position after the move.
        to: WorldPoint,
    },
    /// Confirms that a hostile entered the arena.
    HostileSpawned {
        /// Identifier assigned to the hostile.
        hostile: HostileId,
        /// Position the hostile spawned at.
        position: WorldPoint,
        /// Health assigned to the hostile.
        health: u32,
    },
    /// Reports that a strike damaged a hostile.
    HostileHit {
        /// Identifier of the damaged hostile.
        hostile: HostileId,
        /// Damage dealt by the strike.
        damage: f32,
        /// Health left after the strike.
        remaining: f32,
    },
    /// Reports that a hostile was eliminated.
    HostileKilled {
        /// Identifier of the eliminated hostile.
        hostile: HostileId,
        /// Score awarded for the kill.
        score: u64,
    },
    /// Reports that a hostile damaged the player.
    PlayerDamaged {
        /// Health removed from the player.
        amount: u32,
        /// Player health left after the attack.
        remaining: u32,
    },
    /// Announces that the player died and the session is over.
    PlayerDied,
    /// Confirms that the player equipped another weapon.
    WeaponSelected {
        /// Weapon that is now equipped.
        weapon: WeaponKind,
    },
    /// Confirms that a weapon was refilled.
    Reloaded {
        /// Weapon that was refilled.
        weapon: WeaponKind,
        /// Rounds loaded after the refill.
        rounds: u32,
    },
    /// Reports that a weapon discharged.
    ShotFired {
        /// Weapon that fired.
        weapon: WeaponKind,
        /// Whether at least one hostile was struck.
        hit: bool,
    },
    /// Reports that a firing attempt failed because the weapon is empty.
    OutOfAmmo {
        /// Weapon that failed to fire.
        weapon: WeaponKind,
    },
    /// Confirms that a pickup entered the arena.
    PickupSpawned {
        /// Identifier assigned to the pickup.
        pickup: PickupId,
        /// Position the pickup rests at.
        position: WorldPoint,
        /// Effect granted on collection.
        effect: PickupEffect,
    },
    /// Confirms that the player collected a pickup.
    PickupCollected {
        /// Identifier of the collected pickup.
        pickup: PickupId,
        /// Effect that was applied.
        effect: PickupEffect,
    },
    /// Announces that the arena was cleared and the countdown started.
    CountdownStarted {
        /// Wave that spawns once the countdown expires.
        upcoming_wave: u32,
        /// Ticks remaining before spawning.
        remaining: u32,
    },
    /// Reports that the countdown advanced by one tick.
    CountdownAdvanced {
        /// Ticks remaining before spawning.
        remaining: u32,
    },
    /// Announces that the countdown expired and the next wave must be spawned.
    SpawningStarted {
        /// Wave being spawned.
        wave: u32,
    },
    /// Announces that a wave finished spawning and play resumed.
    WaveStarted {
        /// Wave now in play.
        wave: u32,
        /// Number of hostiles alive at the start of the wave.
        hostiles: u32,
    },
}

/// Single hostile struck by a ray during a discharge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    /// Identifier of the struck hostile.
    pub hostile: HostileId,
    /// Damage dealt by the strike.
    pub damage: f32,
}

impl Strike {
    /// Creates a new strike descriptor.
    #[must_use]
    pub const fn new(hostile: HostileId, damage: f32) -> Self {
        Self { hostile, damage }
    }
}

/// Unique identifier assigned to a hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostileId(u32);

impl HostileId {
    /// Creates a new hostile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Point at the centre of the cell.
    #[must_use]
    pub fn center(self) -> WorldPoint {
        WorldPoint::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

/// Continuous position measured in tile units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new point from column and row coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Coordinate along the column axis.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Coordinate along the row axis.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns the point translated by the provided displacement.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns the point reached by travelling `distance` tiles along `radians`.
    #[must_use]
    pub fn along(self, radians: f32, distance: f32) -> Self {
        self.offset(radians.cos() * distance, radians.sin() * distance)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: WorldPoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle of the vector pointing from this point towards `other`.
    #[must_use]
    pub fn angle_to(self, other: WorldPoint) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Cell containing the point, if it lies in non-negative space.
    #[must_use]
    pub fn cell(self) -> Option<CellCoord> {
        let (column, row) = self.tile_indices();
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Floored tile indices of the point; may be negative.
    #[must_use]
    pub fn tile_indices(self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

/// Facing angle normalised to `[0, 2π)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading(f32);

impl Heading {
    /// Creates a heading from an arbitrary angle, wrapping it into `[0, 2π)`.
    #[must_use]
    pub fn new(radians: f32) -> Self {
        Self(wrap_angle(radians))
    }

    /// Angle in radians within `[0, 2π)`.
    #[must_use]
    pub const fn radians(&self) -> f32 {
        self.0
    }

    /// Returns the heading rotated by the provided signed angle.
    #[must_use]
    pub fn rotated(self, radians: f32) -> Self {
        Self::new(self.0 + radians)
    }

    /// Signed angle from this heading to `radians`, within `[-π, π]`.
    #[must_use]
    pub fn signed_offset_to(self, radians: f32) -> f32 {
        signed_angle(radians - self.0)
    }
}

fn wrap_angle(radians: f32) -> f32 {
    if !radians.is_finite() {
        return 0.0;
    }

    let wrapped = radians.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Normalises an angle into `[-π, π]`.
#[must_use]
pub fn signed_angle(radians: f32) -> f32 {
    if !radians.is_finite() {
        return 0.0;
    }

    let wrapped = wrap_angle(radians);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Categories of pickups used for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores player health.
    Health,
    /// Refills the equipped weapon.
    Ammo,
}

/// One-time effect granted by collecting a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupEffect {
    /// Restores the provided amount of health, clamped to the maximum.
    Heal {
        /// Health restored.
        amount: u32,
    },
    /// Adds rounds to the equipped weapon, clamped to its capacity.
    Resupply {
        /// Rounds added.
        rounds: u32,
    },
}

impl PickupEffect {
    /// Presentation category of the effect.
    #[must_use]
    pub const fn kind(&self) -> PickupKind {
        match self {
            Self::Heal { .. } => PickupKind::Health,
            Self::Resupply { .. } => PickupKind::Ammo,
        }
    }
}

/// Phase of the wave cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Hostiles may be alive and combat is enabled.
    Active,
    /// The arena was cleared; the next wave spawns when the countdown expires.
    Countdown {
        /// One-second ticks left before spawning.
        remaining: u32,
    },
    /// The next wave is being placed into the arena.
    Spawning,
}

/// Whether the session is still being played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// The player is alive.
    Playing,
    /// The player died; only a restart is accepted.
    Over,
}

/// Discrete input events forwarded from adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// The fire button was pressed.
    FireDown,
    /// The fire button was released.
    FireUp,
    /// The reload key was pressed.
    Reload,
    /// A weapon slot key was pressed.
    SelectWeapon(WeaponKind),
    /// The pause key was pressed.
    TogglePause,
}

/// Continuous movement intent sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MovementIntent {
    /// Move along the facing direction.
    pub forward: bool,
    /// Move against the facing direction.
    pub back: bool,
    /// Move perpendicular to the facing, towards the left.
    pub strafe_left: bool,
    /// Move perpendicular to the facing, towards the right.
    pub strafe_right: bool,
}

impl MovementIntent {
    /// Reports whether any direction is requested.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !(self.forward || self.back || self.strafe_left || self.strafe_right)
    }
}

/// Fire-and-forget notifications for the audio layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notification {
    /// A weapon discharged.
    ShotFired,
    /// A strike damaged a hostile.
    HitLanded,
    /// A hostile was eliminated.
    Kill,
    /// A weapon was refilled.
    Reload,
    /// A firing attempt failed because the weapon is empty.
    OutOfAmmo,
    /// The player collected a pickup.
    PickupCollected,
    /// A hostile damaged the player.
    PlayerDamaged,
}

impl Notification {
    /// Maps a world event onto the notification it triggers, if any.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::ShotFired { .. } => Some(Self::ShotFired),
            Event::HostileHit { .. } => Some(Self::HitLanded),
            Event::HostileKilled { .. } => Some(Self::Kill),
            Event::Reloaded { .. } => Some(Self::Reload),
            Event::OutOfAmmo { .. } => Some(Self::OutOfAmmo),
            Event::PickupCollected { .. } => Some(Self::PickupCollected),
            Event::PlayerDamaged { .. } => Some(Self::PlayerDamaged),
            _ => None,
        }
    }
}

/// Read-only snapshot describing all live hostiles.
#[derive(Clone, Debug, Default)]
pub struct HostileView {
    snapshots: Vec<HostileSnapshot>,
}

impl HostileView {
    /// Creates a new view from the provided snapshots, sorted by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<HostileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured hostile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &HostileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of live hostiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no hostile is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<HostileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single hostile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostileSnapshot {
    /// Unique identifier assigned to the hostile.
    pub id: HostileId,
    /// Current position.
    pub position: WorldPoint,
    /// Health left.
    pub health: f32,
    /// Health the hostile spawned with.
    pub max_health: u32,
    /// Simulation time of the last melee attack, if any.
    pub last_attack: Option<Duration>,
    /// Simulation time of the last strike received, if any.
    pub last_hit: Option<Duration>,
}

/// Read-only snapshot describing all uncollected pickups.
#[derive(Clone, Debug, Default)]
pub struct PickupView {
    snapshots: Vec<PickupSnapshot>,
}

impl PickupView {
    /// Creates a new view from the provided snapshots, sorted by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PickupSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured pickup snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PickupSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PickupSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single pickup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Unique identifier assigned to the pickup.
    pub id: PickupId,
    /// Position of the pickup.
    pub position: WorldPoint,
    /// Effect granted on collection.
    pub effect: PickupEffect,
}

/// Immutable representation of the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current position.
    pub position: WorldPoint,
    /// Current facing.
    pub heading: Heading,
    /// Health left.
    pub health: u32,
}

/// Immutable representation of the equipped weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponSnapshot {
    /// Weapon currently equipped.
    pub kind: WeaponKind,
    /// Ammunition loaded in the weapon.
    pub ammo: AmmoCount,
    /// Interval between automatic shots while the trigger is held.
    pub fire_interval: Duration,
}

/// Immutable representation of the wave and scoring state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundSnapshot {
    /// Last wave that was spawned, zero before the first.
    pub wave: u32,
    /// Waves cleared so far.
    pub rounds_survived: u32,
    /// Hostiles eliminated so far.
    pub kills: u32,
    /// Discharges so far.
    pub shots_fired: u32,
    /// Discharges that struck at least one hostile.
    pub shots_hit: u32,
    /// Accumulated score.
    pub score: u64,
    /// Current streak multiplier.
    pub streak: StreakMultiplier,
    /// Current phase of the wave cycle.
    pub phase: RoundPhase,
    /// Whether the session is still being played.
    pub status: SessionStatus,
}

impl RoundSnapshot {
    /// Wave shown to the player: the wave in play, or the one about to spawn.
    #[must_use]
    pub const fn display_wave(&self) -> u32 {
        match self.phase {
            RoundPhase::Active if self.wave > 0 => self.wave,
            _ => self.wave + 1,
        }
    }
}

/// Read-only data backing the heads-up display.
#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Player health.
    pub health: u32,
    /// Wave shown to the player.
    pub wave: u32,
    /// Current streak multiplier.
    pub streak: StreakMultiplier,
    /// Ammunition in the equipped weapon.
    pub ammo: AmmoCount,
    /// Display name of the equipped weapon.
    pub weapon_name: &'static str,
    /// Accumulated score.
    pub score: u64,
    /// Current phase of the wave cycle.
    pub phase: RoundPhase,
    /// Whether the session is still being played.
    pub status: SessionStatus,
    /// Whether the simulation is paused.
    pub paused: bool,
}

/// Terminal point of the most recent discharge, kept for the shot trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotTrace {
    /// Point where the first ray stopped.
    pub end: WorldPoint,
    /// Simulation time the discharge happened at.
    pub fired_at: Duration,
}

impl ShotTrace {
    /// Reports whether the trace is still within its display window at `now`.
    #[must_use]
    pub fn is_visible(&self, now: Duration, window: Duration) -> bool {
        now.saturating_sub(self.fired_at) < window
    }
}

/// Final record emitted when a session ends.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Final score.
    pub score: u64,
    /// Waves cleared before dying.
    pub waves_survived: u32,
    /// Hostiles eliminated.
    pub kills: u32,
    /// Discharges fired.
    pub shots_fired: u32,
    /// Discharges that struck at least one hostile.
    pub shots_hit: u32,
    /// Percentage of discharges that struck a hostile.
    pub accuracy_percent: f32,
}
