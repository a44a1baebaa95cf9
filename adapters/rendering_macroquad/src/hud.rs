//! Heads-up display text and overlays.

use macroquad::{
    color::{Color as MacroquadColor, WHITE},
    shapes::draw_rectangle,
    text::draw_text,
};
use raycast_arena_core::{AmmoCount, HudSnapshot, RoundPhase, SessionSummary};

const FONT_SIZE: f32 = 24.0;
const LINE_HEIGHT: f32 = 26.0;
const MARGIN: f32 = 12.0;
const OVERLAY: MacroquadColor = MacroquadColor::new(0.0, 0.0, 0.0, 0.6);

pub(crate) fn ammo_label(ammo: AmmoCount) -> String {
    match ammo {
        AmmoCount::Unlimited => "unlimited".to_owned(),
        AmmoCount::Rounds(rounds) => rounds.to_string(),
    }
}

pub(crate) fn hud_lines(hud: &HudSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!("Health: {}", hud.health),
        format!("Wave: {}", hud.wave),
        format!("Streak: x{:.1}", hud.streak.value()),
        format!("{}: {}", hud.weapon_name, ammo_label(hud.ammo)),
        format!("Score: {}", hud.score),
    ];
    if let RoundPhase::Countdown { remaining } = hud.phase {
        lines.push(format!("Next wave in {remaining}"));
    }
    lines
}

pub(crate) fn summary_lines(summary: &SessionSummary) -> Vec<String> {
    vec![
        "GAME OVER".to_owned(),
        format!("Score: {}", summary.score),
        format!("Waves survived: {}", summary.waves_survived),
        format!("Kills: {}", summary.kills),
        format!("Accuracy: {:.1}%", summary.accuracy_percent),
        "Press Enter to restart".to_owned(),
    ]
}

pub(crate) fn draw_hud(hud: &HudSnapshot, screen_width: f32) {
    let left = screen_width - 260.0;
    for (index, line) in hud_lines(hud).iter().enumerate() {
        let baseline = MARGIN + LINE_HEIGHT * (index + 1) as f32;
        let _ = draw_text(line, left, baseline, FONT_SIZE, WHITE);
    }
}

pub(crate) fn draw_overlay(lines: &[String], screen_width: f32, screen_height: f32) {
    draw_rectangle(0.0, 0.0, screen_width, screen_height, OVERLAY);

    let first = screen_height / 2.0 - LINE_HEIGHT * lines.len() as f32 / 2.0;
    for (index, line) in lines.iter().enumerate() {
        let left = screen_width / 2.0 - line.len() as f32 * FONT_SIZE / 4.0;
        let _ = draw_text(line, left, first + LINE_HEIGHT * index as f32, FONT_SIZE, WHITE);
    }
}
