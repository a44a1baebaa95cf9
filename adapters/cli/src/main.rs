#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Raycast Arena experience.

mod config;
mod headless;
mod leaderboard;
mod scene;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use raycast_arena_core::{GridMap, SessionSummary, DEFAULT_ARENA};
use raycast_arena_rendering::{Color, Presentation, RenderingBackend};
use raycast_arena_rendering_macroquad::MacroquadBackend;
use raycast_arena_simulation::{Config, Simulation};
use tracing_subscriber::EnvFilter;

use self::{
    config::{FileConfig, Overrides, Settings},
    leaderboard::{Leaderboard, DEFAULT_NAME},
};

/// Command-line arguments accepted by the Raycast Arena binary.
#[derive(Debug, Parser)]
#[command(name = "raycast-arena")]
#[command(about = "Wave-based raycasting arena shooter")]
struct CliArgs {
    /// Seed for every random stream of the session.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file supplying defaults for the other options.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Arena file to play instead of the built-in arena.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,
    /// Multiplier applied to mouse and keyboard look.
    #[arg(long)]
    sensitivity: Option<f32>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: Option<bool>,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Leaderboard JSON file.
    #[arg(long, value_name = "PATH")]
    leaderboard: Option<PathBuf>,
    /// Name recorded on the leaderboard.
    #[arg(long)]
    name: Option<String>,
    /// Run this many 16 ms frames without a window and print the summary.
    #[arg(long, value_name = "FRAMES")]
    headless_frames: Option<u32>,
}

/// Entry point for the Raycast Arena command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(
        file,
        Overrides {
            seed: args.seed,
            look_sensitivity: args.sensitivity,
            map: args.map.clone(),
            leaderboard: args.leaderboard.clone(),
            player_name: args.name.clone(),
        },
    )?;

    let map = load_map(&settings)?;
    let simulation = Simulation::new(
        map,
        Config::new(settings.seed, settings.player_speed, settings.look_sensitivity),
    );
    tracing::info!(seed = settings.seed, "{}", simulation.welcome_banner());

    match args.headless_frames {
        Some(frames) => run_headless(simulation, frames),
        None => run_windowed(simulation, settings, &args),
    }
}

fn load_map(settings: &Settings) -> Result<GridMap> {
    match &settings.map {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read map {}", path.display()))?;
            GridMap::parse(&source).with_context(|| format!("invalid map {}", path.display()))
        }
        None => GridMap::parse(DEFAULT_ARENA).context("built-in arena is invalid"),
    }
}

fn run_headless(mut simulation: Simulation, frames: u32) -> Result<()> {
    let report = headless::run(&mut simulation, frames);
    tracing::info!(
        frames = report.frames,
        died = report.died,
        notifications = report.notifications,
        "headless run finished"
    );
    print_summary(&report.summary);
    Ok(())
}

fn run_windowed(mut simulation: Simulation, settings: Settings, args: &CliArgs) -> Result<()> {
    let scene = scene::initial_scene(&simulation);
    let presentation = Presentation::new("Raycast Arena", Color::from_rgb_u8(0, 0, 0), scene);

    let mut backend = MacroquadBackend::new().with_show_fps(args.show_fps);
    if let Some(vsync) = args.vsync {
        backend = backend.with_vsync(vsync);
    }

    let leaderboard_path = settings.leaderboard;
    let player_name = settings
        .player_name
        .unwrap_or_else(|| DEFAULT_NAME.to_owned());
    let mut summary: Option<SessionSummary> = None;

    backend.run(presentation, move |timestamp, input, scene| {
        if input.restart && simulation.is_over() {
            simulation.restart();
            summary = None;
        }
        for event in input.events {
            simulation.handle_input(event);
        }
        simulation.update(timestamp, input.intent, input.look_delta);
        for notification in simulation.drain_notifications() {
            tracing::debug!(?notification, "cue");
        }

        if let Some(finished) = simulation.take_summary() {
            record_score(&leaderboard_path, &player_name, &finished);
            summary = Some(finished);
        }
        scene::populate_scene(&simulation, summary, scene);
    })
}

fn record_score(path: &Path, name: &str, summary: &SessionSummary) {
    let result = Leaderboard::load(path).and_then(|mut leaderboard| {
        let rank = leaderboard.record(name, summary);
        leaderboard.save(path)?;
        Ok((rank, leaderboard))
    });

    match result {
        Ok((rank, leaderboard)) => {
            tracing::info!(
                path = %path.display(),
                rank = ?rank.map(|index| index + 1),
                score = summary.score,
                "leaderboard updated"
            );
            for (index, entry) in leaderboard.entries().iter().enumerate() {
                tracing::info!(
                    "{:>2}. {:<10} {:>7}  wave {:>3}  kills {:>4}  {:>5.1}%",
                    index + 1,
                    entry.name,
                    entry.score,
                    entry.waves_survived,
                    entry.kills,
                    entry.accuracy_percent
                );
            }
        }
        Err(error) => tracing::warn!(%error, "failed to update leaderboard"),
    }
}

fn print_summary(summary: &SessionSummary) {
    println!("Score:          {}", summary.score);
    println!("Waves survived: {}", summary.waves_survived);
    println!("Kills:          {}", summary.kills);
    println!(
        "Accuracy:       {:.1}% ({}/{})",
        summary.accuracy_percent, summary.shots_hit, summary.shots_fired
    );
}
