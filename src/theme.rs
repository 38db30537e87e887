//! Colour styles, glyphs and animation frames.
//!
//! Design principles:
//! - **No hardcoded backgrounds.** Every style omits `.bg()` so the terminal's
//!   native background shines through.
//! - Colours come from the configured palette; cats and dogs each get their
//!   own accent.

use ratatui::style::{Color, Modifier, Style};

use crate::api::types::{Severity, VoteOption};
use crate::config::{self, Palette};

fn palette() -> &'static Palette {
    &config::get().theme.palette
}

// ─── Palette accessors ──────────────────────────────────────────────────────

pub fn accent() -> Color {
    palette().accent
}

pub fn text_dim() -> Color {
    palette().text_dim
}

/// Accent colour for a vote option's card and bar.
pub fn option_color(option: VoteOption) -> Color {
    match option {
        VoteOption::Cats => palette().cats,
        VoteOption::Dogs => palette().dogs,
    }
}

pub fn severity_color(severity: Severity) -> Color {
    let p = palette();
    match severity {
        Severity::Success => p.success,
        Severity::Error => p.error,
        Severity::Warning => p.warning,
        Severity::Info => p.info,
    }
}

// ─── Composite styles ───────────────────────────────────────────────────────

/// Title / header style.
pub fn title() -> Style {
    Style::default().fg(accent()).add_modifier(Modifier::BOLD)
}

/// Normal body text.
pub fn text() -> Style {
    Style::default().fg(palette().text_primary)
}

/// Dimmed / secondary label.
pub fn dim() -> Style {
    Style::default().fg(text_dim())
}

pub fn error() -> Style {
    Style::default()
        .fg(palette().error)
        .add_modifier(Modifier::BOLD)
}

pub fn success() -> Style {
    Style::default().fg(palette().success)
}

/// Enabled vote button.
pub fn button(option: VoteOption) -> Style {
    Style::default()
        .fg(option_color(option))
        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
}

/// Disabled vote button.
pub fn button_disabled() -> Style {
    Style::default()
        .fg(text_dim())
        .add_modifier(Modifier::ITALIC)
}

pub fn border_active() -> Style {
    Style::default().fg(accent())
}

pub fn border_inactive() -> Style {
    Style::default().fg(text_dim())
}

// ─── Glyphs ─────────────────────────────────────────────────────────────────

/// Leading icon for a toast.
pub fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✔",
        Severity::Error => "✖",
        Severity::Warning => "⚠",
        Severity::Info => "ℹ",
    }
}

// ─── Spinner frames ─────────────────────────────────────────────────────────

/// Braille-dot spinner frames for the busy and polling indicators.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Get the current spinner frame for a given tick count.
pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}
