//! Presentation tables: labels, glyphs and colors for engine states.
//!
//! The engine only produces states; how they look lives here.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde::Serialize;

use skillcascade_types::health::{HealthState, ReadinessStatus};
use skillcascade_types::insight::RiskKind;

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A table with the house style and the given header row.
pub fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.iter().map(|h| Cell::new(h).fg(Color::White)));
    table
}

pub fn section(title: &str) {
    println!();
    println!("  {}", style(format!("── {title} ──")).dim());
}

pub fn info(message: &str) {
    println!();
    println!("  {} {}", style("i").blue().bold(), message);
    println!();
}

pub fn state_label(state: HealthState) -> &'static str {
    match state {
        HealthState::Locked => "◌ locked",
        HealthState::Blocked => "■ blocked",
        HealthState::NeedsWork => "○ needs work",
        HealthState::Developing => "◐ developing",
        HealthState::Mastered => "● mastered",
    }
}

pub fn state_color(state: HealthState) -> Color {
    match state {
        HealthState::Locked => Color::DarkGrey,
        HealthState::Blocked => Color::Red,
        HealthState::NeedsWork => Color::Yellow,
        HealthState::Developing => Color::Cyan,
        HealthState::Mastered => Color::Green,
    }
}

pub fn state_cell(state: HealthState) -> Cell {
    Cell::new(state_label(state)).fg(state_color(state))
}

pub fn readiness_cell(status: Option<ReadinessStatus>) -> Cell {
    match status {
        Some(ReadinessStatus::Met) => Cell::new("✓ met").fg(Color::Green),
        Some(ReadinessStatus::Close) => Cell::new("~ close").fg(Color::Yellow),
        Some(ReadinessStatus::Unmet) => Cell::new("✗ unmet").fg(Color::Red),
        None => Cell::new("goal").fg(Color::Cyan),
    }
}

/// Readiness phrased for plain-text summaries.
pub fn readiness_word(status: ReadinessStatus) -> &'static str {
    match status {
        ReadinessStatus::Met => "ready",
        ReadinessStatus::Close => "almost ready",
        ReadinessStatus::Unmet => "not ready",
    }
}

pub fn risk_cell(kind: RiskKind) -> Cell {
    match kind {
        RiskKind::Inversion => Cell::new("inversion").fg(Color::Magenta),
        RiskKind::Regression => Cell::new("regression").fg(Color::Red),
        RiskKind::Bottleneck => Cell::new("bottleneck").fg(Color::Yellow),
    }
}

/// Fixed-width bar for a value in `[0, max]`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    let ratio = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}
