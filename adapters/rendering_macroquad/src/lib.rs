#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Raycast Arena.
//!
//! Macroquad is pulled in without its default `audio` feature because the
//! audio backend needs native ALSA headers at build time, and the game makes
//! no sound anyway.
//!
//! The adapter only rasterises primitives. Projection happens in
//! [`raycast_arena_rendering::raycast`] and [`raycast_arena_rendering::minimap`].

mod hud;
mod input;

pub use self::input::{InputObservations, InputTranslator, KEY_TURN_RATE};

use anyhow::Result;
use macroquad::{
    color::{BLACK, GREEN},
    input::{is_key_pressed, KeyCode},
    shapes::{draw_circle, draw_line, draw_rectangle},
};
use raycast_arena_core::SessionStatus;
use raycast_arena_rendering::{
    minimap::{self, DEFAULT_SCALE},
    raycast::{self, Frame, SpriteKind, Viewport},
    Color, FrameInput, Presentation, RenderingBackend, Scene,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

const HEALTH_BAR_HEIGHT: f32 = 5.0;
const HEALTH_BAR_GAP: f32 = 10.0;
const TRACE_THICKNESS: f32 = 2.0;

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

/// Frame rate over the last second and the last ten seconds.
///
/// Reports at most once per second of presented frame time.
#[derive(Debug, Default)]
struct FpsCounter {
    history: VecDeque<FrameBreakdown>,
    history_span: Duration,
    since_report: Duration,
}

impl FpsCounter {
    const REPORT_INTERVAL: Duration = Duration::from_secs(1);
    const TRAILING_WINDOW: Duration = Duration::from_secs(10);

    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.history.push_back(breakdown);
        self.history_span += breakdown.frame;
        self.since_report += breakdown.frame;

        while self.history_span > Self::TRAILING_WINDOW {
            let Some(oldest) = self.history.pop_front() else {
                break;
            };
            self.history_span = self.history_span.saturating_sub(oldest.frame);
        }

        if self.since_report < Self::REPORT_INTERVAL {
            return None;
        }
        let report_span = std::mem::take(&mut self.since_report);

        let mut covered = Duration::ZERO;
        let mut recent = FrameBreakdown::default();
        let mut frames = 0_u32;
        for sample in self.history.iter().rev() {
            if covered >= report_span {
                break;
            }
            covered += sample.frame;
            recent.simulation += sample.simulation;
            recent.render += sample.render;
            frames += 1;
        }

        let rate = |frames: usize, span: Duration| {
            let seconds = span.as_secs_f32();
            if seconds <= f32::EPSILON {
                0.0
            } else {
                frames as f32 / seconds
            }
        };

        Some(FpsMetrics {
            per_second: rate(frames as usize, covered),
            trailing_ten_seconds: rate(self.history.len(), self.history_span),
            avg_simulation: recent.simulation / frames.max(1),
            avg_render: recent.render / frames.max(1),
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 960,
            window_height: 640,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut translator = InputTranslator::new();

            loop {
                if is_key_pressed(KeyCode::Q) {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let dt_seconds = macroquad::time::get_frame_time().max(0.0);
                let frame_dt = Duration::from_secs_f32(dt_seconds);
                let timestamp = Duration::from_secs_f64(macroquad::time::get_time().max(0.0));

                let observations = InputObservations::poll();
                let frame_input = translator.translate(&observations, dt_seconds);
                let was_paused = scene.hud.paused;

                let simulation_start = Instant::now();
                update_scene(timestamp, frame_input, &mut scene);
                let simulation = simulation_start.elapsed();

                if was_paused != scene.hud.paused {
                    translator.reset_pointer();
                }

                let render_start = Instant::now();
                if let Ok(viewport) = Viewport::new(screen_width as u32, screen_height as u32) {
                    let frame = raycast::render(&scene, viewport);
                    draw_frame(&frame);
                }
                draw_minimap(&scene);
                hud::draw_hud(&scene.hud, screen_width);

                if scene.hud.status == SessionStatus::Over {
                    if let Some(summary) = &scene.summary {
                        let lines = hud::summary_lines(summary);
                        hud::draw_overlay(&lines, screen_width, screen_height);
                    }
                } else if scene.hud.paused {
                    let lines = ["PAUSED".to_owned(), "Press Esc or P to resume".to_owned()];
                    hud::draw_overlay(&lines, screen_width, screen_height);
                }
                let render = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation,
                    render,
                });
                if show_fps {
                    if let Some(metrics) = fps_metrics {
                        tracing::info!(
                            fps = metrics.per_second,
                            trailing_fps = metrics.trailing_ten_seconds,
                            simulation_ms = metrics.avg_simulation.as_secs_f64() * 1_000.0,
                            render_ms = metrics.avg_render.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_frame(frame: &Frame) {
    for column in &frame.columns {
        draw_rectangle(
            column.x as f32,
            column.top,
            1.0,
            column.height,
            to_macroquad_color(column.color),
        );
    }

    for sprite in &frame.sprites {
        draw_rectangle(
            sprite.left,
            sprite.top,
            sprite.size,
            sprite.size,
            to_macroquad_color(sprite.color),
        );

        if let SpriteKind::Hostile { health_ratio, .. } = sprite.kind {
            let bar_left = sprite.left + sprite.size / 4.0;
            let bar_top = sprite.top - HEALTH_BAR_GAP;
            let bar_width = sprite.size / 2.0;
            draw_rectangle(bar_left, bar_top, bar_width, HEALTH_BAR_HEIGHT, BLACK);
            draw_rectangle(
                bar_left,
                bar_top,
                bar_width * health_ratio,
                HEALTH_BAR_HEIGHT,
                GREEN,
            );
        }
    }

    if let Some(trace) = frame.trace {
        draw_line(
            trace.from.x,
            trace.from.y,
            trace.to.x,
            trace.to.y,
            TRACE_THICKNESS,
            to_macroquad_color(trace.color),
        );
    }
}

fn draw_minimap(scene: &Scene) {
    let layout = minimap::layout(scene, DEFAULT_SCALE);
    for rect in layout.cells.iter().chain(&layout.markers) {
        draw_rectangle(
            rect.origin.x,
            rect.origin.y,
            rect.size.x,
            rect.size.y,
            to_macroquad_color(rect.color),
        );
    }

    let player = layout.player;
    let color = to_macroquad_color(player.color);
    draw_circle(player.centre.x, player.centre.y, player.radius, color);
    draw_line(
        player.centre.x,
        player.centre.y,
        player.facing.x,
        player.facing.y,
        TRACE_THICKNESS,
        color,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(millis: u64) -> FrameBreakdown {
        FrameBreakdown {
            frame: Duration::from_millis(millis),
            simulation: Duration::from_millis(2),
            render: Duration::from_millis(4),
        }
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        for _ in 0..49 {
            assert!(counter.record_frame(frame(20)).is_none());
        }

        let metrics = counter.record_frame(frame(20)).expect("one second elapsed");
        assert!((metrics.per_second - 50.0).abs() < 1e-3);
        assert!((metrics.trailing_ten_seconds - 50.0).abs() < 1e-3);
        assert_eq!(metrics.avg_simulation, Duration::from_millis(2));
        assert_eq!(metrics.avg_render, Duration::from_millis(4));

        assert!(counter.record_frame(frame(20)).is_none(), "counter restarts");
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let converted = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(converted.r, 0.1);
        assert_eq!(converted.g, 0.2);
        assert_eq!(converted.b, 0.3);
        assert_eq!(converted.a, 0.4);
    }
}
