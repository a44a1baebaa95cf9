#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single simulation context that wires the world to every Raycast Arena system.
//!
//! [`Simulation`] owns the authoritative world, the pure systems and their
//! random streams, the pause state and the frame clock. Adapters feed it
//! discrete [`InputEvent`] values and one [`Simulation::update`] call per
//! displayed frame, then read snapshots back for presentation. Every command
//! produced by a system is applied to the world immediately and the resulting
//! events are pumped back through the systems until nothing new happens.

mod clock;

use std::time::Duration;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use raycast_arena_core::{
    Command, Event, GridMap, HostileView, HudSnapshot, InputEvent, MovementIntent, Notification,
    PickupView, PlayerSnapshot, RoundPhase, RoundSnapshot, SessionStatus, SessionSummary,
    ShotTrace, WeaponSnapshot,
};
use raycast_arena_system_analytics::{hud_snapshot, Analytics};
use raycast_arena_system_bootstrap::Bootstrap;
use raycast_arena_system_combat::{Combat, FireControl};
use raycast_arena_system_hostile_ai::HostileAi;
use raycast_arena_system_movement::Movement;
use raycast_arena_system_pickups::Pickups;
use raycast_arena_system_wave_director::WaveDirector;
use raycast_arena_world::{self as world, query, World};

pub use clock::{FrameClock, MAX_FRAME_DELTA};

const COMBAT_STREAM: u64 = 1;
const WAVE_STREAM: u64 = 2;
const PICKUP_STREAM: u64 = 3;

/// Upper bound on command/event round trips within a single pump.
const MAX_PUMP_ROUNDS: usize = 64;

/// Tunables the simulation is constructed with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    seed: u64,
    player_speed: f32,
    look_sensitivity: f32,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// `player_speed` is expressed in tiles per second and scales look deltas
    /// by `look_sensitivity`.
    #[must_use]
    pub const fn new(seed: u64, player_speed: f32, look_sensitivity: f32) -> Self {
        Self {
            seed,
            player_speed,
            look_sensitivity,
        }
    }

    /// Seed every random stream is derived from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Player walking speed in tiles per second.
    #[must_use]
    pub const fn player_speed(&self) -> f32 {
        self.player_speed
    }

    /// Multiplier applied to look deltas.
    #[must_use]
    pub const fn look_sensitivity(&self) -> f32 {
        self.look_sensitivity
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0, 6.0, 1.0)
    }
}

/// Explicit context holding the whole game session.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    map: GridMap,
    bootstrap: Bootstrap,
    movement: Movement,
    combat: Combat,
    fire_control: FireControl,
    hostile_ai: HostileAi,
    wave_director: WaveDirector,
    pickups: Pickups,
    analytics: Analytics,
    clock: FrameClock,
    paused: bool,
    notifications: Vec<Notification>,
    summary: Option<SessionSummary>,
}

impl Simulation {
    /// Creates a session on `map` and loads the arena.
    #[must_use]
    pub fn new(map: GridMap, config: Config) -> Self {
        let seed = config.seed();
        let mut simulation = Self {
            world: World::new(),
            map,
            bootstrap: Bootstrap,
            movement: Movement::new(raycast_arena_system_movement::Config::new(
                config.player_speed(),
                config.look_sensitivity(),
            )),
            combat: Combat::new(raycast_arena_system_combat::Config::new(stream_seed(
                seed,
                COMBAT_STREAM,
            ))),
            fire_control: FireControl::new(),
            hostile_ai: HostileAi::default(),
            wave_director: WaveDirector::new(
                raycast_arena_system_wave_director::Config::with_seed(stream_seed(
                    seed,
                    WAVE_STREAM,
                )),
            ),
            pickups: Pickups::new(raycast_arena_system_pickups::Config::with_seed(
                stream_seed(seed, PICKUP_STREAM),
            )),
            analytics: Analytics::new(),
            clock: FrameClock::default(),
            paused: false,
            notifications: Vec::new(),
            summary: None,
        };
        simulation.load();
        simulation
    }

    /// Applies a discrete player input.
    pub fn handle_input(&mut self, input: InputEvent) {
        if input == InputEvent::TogglePause {
            self.set_paused(!self.paused);
            return;
        }
        if input == InputEvent::FireUp {
            self.fire_control.release();
            return;
        }
        if self.paused || query::is_over(&self.world) {
            return;
        }

        match input {
            InputEvent::FireDown => {
                if !self.combat_allowed() {
                    return;
                }
                if self.fire_control.press() {
                    let events = self.execute(Command::PullTrigger);
                    self.pump(events);
                    self.fire();
                }
            }
            InputEvent::Reload => {
                let events = self.execute(Command::Reload);
                self.pump(events);
            }
            InputEvent::SelectWeapon(weapon) => {
                let events = self.execute(Command::SelectWeapon { weapon });
                self.pump(events);
                if self.fire_control.is_held() {
                    self.fire_control.rearm(query::weapon(&self.world).fire_interval);
                }
            }
            InputEvent::FireUp | InputEvent::TogglePause => {}
        }
    }

    /// Advances the session to the frame presented at `timestamp`.
    ///
    /// Timestamps are measured from any fixed origin; only their differences
    /// matter. Paused sessions ignore the call entirely.
    pub fn update(&mut self, timestamp: Duration, intent: MovementIntent, look_delta: f32) {
        if self.paused {
            return;
        }
        let dt = self.clock.tick(timestamp);
        self.step(dt, intent, look_delta);
    }

    /// Advances the session by exactly `dt` of simulated time.
    pub fn step(&mut self, dt: Duration, intent: MovementIntent, look_delta: f32) {
        if self.paused {
            return;
        }

        let mut events = self.execute(Command::Tick { dt });

        let mut commands = Vec::new();
        let player = query::player(&self.world);
        self.movement.handle(
            &events,
            query::round(&self.world).status,
            player.heading,
            intent,
            look_delta,
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.pump(events);

        if self.fire_control.advance(dt) && self.combat_allowed() {
            self.fire();
        }
        self.enforce_fire_window();
    }

    /// Pauses or resumes the session.
    ///
    /// Pausing releases the trigger and suspends the frame clock so that the
    /// first frame after resuming does not carry the paused duration.
    pub fn set_paused(&mut self, paused: bool) {
        if paused == self.paused {
            return;
        }
        self.paused = paused;
        self.clock.suspend();
        if paused {
            self.fire_control.release();
        }
        tracing::debug!(paused, "pause toggled");
    }

    /// Reloads the arena and starts a fresh session.
    pub fn restart(&mut self) {
        self.fire_control.release();
        self.wave_director.cancel();
        self.analytics.reset();
        self.clock.suspend();
        self.paused = false;
        self.notifications.clear();
        self.summary = None;
        self.load();
        tracing::info!("session restarted");
    }

    /// Hands out the end-of-session summary once after the player died.
    pub fn take_summary(&mut self) -> Option<SessionSummary> {
        self.summary.take()
    }

    /// Removes and returns the notifications produced since the last drain.
    pub fn drain_notifications(&mut self) -> impl Iterator<Item = Notification> + '_ {
        self.notifications.drain(..)
    }

    /// Reports whether the session is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Reports whether the player died.
    #[must_use]
    pub fn is_over(&self) -> bool {
        query::is_over(&self.world)
    }

    /// Reports whether the trigger is held.
    #[must_use]
    pub const fn trigger_held(&self) -> bool {
        self.fire_control.is_held()
    }

    /// Reports whether a between-wave countdown tick is pending.
    #[must_use]
    pub fn countdown_pending(&self) -> bool {
        self.wave_director.is_counting_down()
    }

    /// Banner greeting the player.
    #[must_use]
    pub fn welcome_banner(&self) -> &str {
        self.bootstrap.welcome_banner(&self.world)
    }

    /// Arena being played.
    #[must_use]
    pub fn map(&self) -> &GridMap {
        query::map(&self.world)
    }

    /// Current player state.
    #[must_use]
    pub fn player(&self) -> PlayerSnapshot {
        query::player(&self.world)
    }

    /// Live hostiles ordered by id.
    #[must_use]
    pub fn hostiles(&self) -> HostileView {
        query::hostile_view(&self.world)
    }

    /// Uncollected pickups ordered by id.
    #[must_use]
    pub fn pickups(&self) -> PickupView {
        query::pickup_view(&self.world)
    }

    /// Equipped weapon state.
    #[must_use]
    pub fn weapon(&self) -> WeaponSnapshot {
        query::weapon(&self.world)
    }

    /// Wave and scoring state.
    #[must_use]
    pub fn round(&self) -> RoundSnapshot {
        query::round(&self.world)
    }

    /// Most recent discharge, if any.
    #[must_use]
    pub fn last_shot(&self) -> Option<ShotTrace> {
        query::last_shot(&self.world)
    }

    /// Simulated time since the arena was loaded.
    #[must_use]
    pub fn now(&self) -> Duration {
        query::clock(&self.world)
    }

    /// Data shown on the heads-up display.
    #[must_use]
    pub fn hud(&self) -> HudSnapshot {
        hud_snapshot(
            &query::player(&self.world),
            &query::weapon(&self.world),
            &query::round(&self.world),
            self.paused,
        )
    }

    fn load(&mut self) {
        let command = self.bootstrap.load_arena(self.map.clone());
        let events = self.execute(command);
        self.pump(events);
    }

    fn combat_allowed(&self) -> bool {
        let round = query::round(&self.world);
        round.status == SessionStatus::Playing && round.phase == RoundPhase::Active
    }

    fn fire(&mut self) {
        let command = self.combat.resolve(
            &query::weapon(&self.world),
            &query::player(&self.world),
            query::round(&self.world).streak,
            query::map(&self.world),
            &query::hostile_view(&self.world),
        );
        let events = self.execute(command);
        self.pump(events);
        self.fire_control.rearm(query::weapon(&self.world).fire_interval);
    }

    fn enforce_fire_window(&mut self) {
        if self.fire_control.is_held() && !self.combat_allowed() {
            self.fire_control.release();
        }
    }

    fn execute(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    fn pump(&mut self, initial: Vec<Event>) {
        let mut events = initial;

        for _ in 0..MAX_PUMP_ROUNDS {
            if events.is_empty() {
                return;
            }
            self.observe(&events);

            let round = query::round(&self.world);
            let player = query::player(&self.world);
            let hostiles = query::hostile_view(&self.world);
            let pickups = query::pickup_view(&self.world);
            let now = query::clock(&self.world);

            let mut commands = Vec::new();
            self.bootstrap.handle(&events, &self.world, &mut commands);
            self.hostile_ai
                .handle(&events, &round, &player, &hostiles, now, &mut commands);
            self.wave_director.handle(
                &events,
                &round,
                &player,
                &hostiles,
                query::map(&self.world),
                &mut commands,
            );
            self.pickups.handle(
                &events,
                &round,
                &player,
                &hostiles,
                &pickups,
                query::map(&self.world),
                &mut commands,
            );

            let mut summaries = Vec::new();
            self.analytics.handle(&events, &round, &mut summaries);
            if let Some(summary) = summaries.pop() {
                tracing::info!(
                    score = summary.score,
                    waves_survived = summary.waves_survived,
                    kills = summary.kills,
                    accuracy_percent = summary.accuracy_percent,
                    "session over"
                );
                self.fire_control.release();
                self.summary = Some(summary);
            }

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        tracing::warn!(
            pending = events.len(),
            "event pump did not settle; dropping remaining events"
        );
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::WaveStarted { wave, hostiles } => {
                    tracing::info!(wave, hostiles, "wave started");
                }
                Event::CountdownStarted {
                    upcoming_wave,
                    remaining,
                } => {
                    tracing::info!(upcoming_wave, remaining, "countdown started");
                }
                Event::PlayerDied => tracing::info!("player died"),
                _ => {}
            }

            if let Some(notification) = Notification::from_event(event) {
                tracing::debug!(?notification, "notification");
                self.notifications.push(notification);
            }
        }
    }
}

/// Derives the seed of one labelled random stream from the session seed.
fn stream_seed(seed: u64, stream: u64) -> u64 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng.next_u64()
}
