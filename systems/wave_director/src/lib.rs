#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round director that detects cleared waves, runs the countdown and spawns
//! the next wave of hostiles.
//!
//! The director reacts to the world's round phase. Once an active round has
//! no live hostiles it requests a countdown, advances that countdown from a
//! cancellable one-second task, and when the world enters the spawning phase
//! it samples spawn cells for the whole batch before completing the wave.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use raycast_arena_core::{
    CellCoord, Command, Event, GridMap, HostileView, PlayerSnapshot, RoundPhase, RoundSnapshot,
    SessionStatus,
};
use raycast_arena_timers::{Due, TaskHandle, Timers};

const BASE_SPAWN_COUNT: u32 = 5;
const SPAWN_COUNT_INCREMENT: u32 = 2;
const MILESTONE_BONUS: u32 = 2;
const MILESTONE_PERIOD: u32 = 10;
const MAX_SPAWN_COUNT: u32 = 20;
const BASE_HOSTILE_HEALTH: u32 = 50;
const HOSTILE_HEALTH_INCREMENT: u32 = 10;

/// Number of hostiles spawned for the provided one-based wave.
#[must_use]
pub fn spawn_count(wave: u32) -> u32 {
    let wave = wave.max(1);
    let mut count = BASE_SPAWN_COUNT.saturating_add((wave - 1).saturating_mul(SPAWN_COUNT_INCREMENT));
    if wave % MILESTONE_PERIOD == 0 {
        count = count.saturating_add(MILESTONE_BONUS);
    }
    count.min(MAX_SPAWN_COUNT)
}

/// Health every hostile of the provided one-based wave spawns with.
#[must_use]
pub fn hostile_health(wave: u32) -> u32 {
    let wave = wave.max(1);
    BASE_HOSTILE_HEALTH.saturating_add((wave - 1).saturating_mul(HOSTILE_HEALTH_INCREMENT))
}

/// Configuration parameters required to construct the wave director.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    countdown_ticks: u32,
    tick_interval: Duration,
    min_spawn_distance: f32,
    spawn_attempts: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// The countdown lasts `countdown_ticks` ticks of `tick_interval` each.
    /// Hostiles spawn strictly farther than `min_spawn_distance` tiles from
    /// the player and each slot gives up after `spawn_attempts` samples.
    #[must_use]
    pub const fn new(
        countdown_ticks: u32,
        tick_interval: Duration,
        min_spawn_distance: f32,
        spawn_attempts: u32,
        rng_seed: u64,
    ) -> Self {
        Self {
            countdown_ticks,
            tick_interval,
            min_spawn_distance,
            spawn_attempts,
            rng_seed,
        }
    }

    /// Default round pacing driven by the provided seed.
    #[must_use]
    pub const fn with_seed(rng_seed: u64) -> Self {
        Self::new(3, Duration::from_secs(1), 5.0, 100, rng_seed)
    }
}

/// Pure system orchestrating round transitions.
#[derive(Debug)]
pub struct WaveDirector {
    config: Config,
    rng: ChaCha8Rng,
    timers: Timers<()>,
    due: Vec<Due<()>>,
    countdown: Option<TaskHandle>,
}

impl WaveDirector {
    /// Creates a new wave director using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            timers: Timers::new(),
            due: Vec::new(),
            countdown: None,
        }
    }

    /// Reports whether a countdown tick is scheduled.
    #[must_use]
    pub fn is_counting_down(&self) -> bool {
        self.countdown
            .is_some_and(|handle| self.timers.is_pending(handle))
    }

    /// Drops any scheduled countdown tick.
    pub fn cancel(&mut self) {
        self.timers.cancel_all();
        self.countdown = None;
    }

    /// Consumes events and immutable views to emit round transition commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        round: &RoundSnapshot,
        player: &PlayerSnapshot,
        hostiles: &HostileView,
        map: &GridMap,
        out: &mut Vec<Command>,
    ) {
        if round.status == SessionStatus::Over {
            self.cancel();
            return;
        }

        for event in events {
            match event {
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                Event::CountdownStarted { remaining, .. }
                | Event::CountdownAdvanced { remaining } => {
                    if *remaining > 0 {
                        self.schedule_tick();
                    }
                }
                Event::SpawningStarted { wave } => {
                    self.spawn_wave(*wave, player, hostiles, map, out);
                }
                _ => {}
            }
        }

        if round.phase == RoundPhase::Active && hostiles.is_empty() && !self.is_counting_down() {
            out.push(Command::BeginCountdown {
                ticks: self.config.countdown_ticks,
            });
        }
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        self.due.clear();
        self.timers.advance(dt, &mut self.due);
        for due in &self.due {
            if Some(due.handle) == self.countdown {
                self.countdown = None;
                out.push(Command::CountdownTick);
            }
        }
    }

    fn schedule_tick(&mut self) {
        if let Some(handle) = self.countdown.take() {
            let _ = self.timers.cancel(handle);
        }
        self.countdown = Some(self.timers.schedule(self.config.tick_interval, ()));
    }

    fn spawn_wave(
        &mut self,
        wave: u32,
        player: &PlayerSnapshot,
        hostiles: &HostileView,
        map: &GridMap,
        out: &mut Vec<Command>,
    ) {
        let health = hostile_health(wave);
        let mut occupied: Vec<CellCoord> = hostiles
            .iter()
            .filter_map(|hostile| hostile.position.cell())
            .collect();

        for _ in 0..spawn_count(wave) {
            if let Some(cell) = self.sample_cell(player, map, &occupied) {
                occupied.push(cell);
                out.push(Command::SpawnHostile { cell, health });
            }
        }
        out.push(Command::CompleteSpawning);
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

        for _ in 0..self.config.spawn_attempts {
            let cell = CellCoord::new(
                self.rng.gen_range(1..map.columns() - 1),
                self.rng.gen_range(1..map.rows() - 1),
            );
            if !map.tile_at_cell(cell).is_walkable() || occupied.contains(&cell) {
                continue;
            }
            if cell.center().distance_to(player.position) > self.config.min_spawn_distance {
                return Some(cell);
            }
        }
        None
    }
}
