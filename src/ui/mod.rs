//! Top-level UI render dispatch.
//!
//! Splits the terminal frame into:
//! - Status bar (top, 3 lines)
//! - Vote cards (left) + results panel (right)
//! - Key hints bar (bottom, 1 line)
//! - Overlays on top: toasts, busy overlay, help

pub mod help;
pub mod key_bar;
pub mod overlay;
pub mod results_panel;
pub mod spinner;
pub mod status_bar;
pub mod toast;
pub mod vote_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::config;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let results_pct = config::get().general.results_panel_percent;
    let votes_pct = 100u16.saturating_sub(results_pct);

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // status bar
            Constraint::Min(0),    // main content
            Constraint::Length(1), // key hints bar
        ])
        .split(frame.area());

    status_bar::render(frame, app, outer[0]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(votes_pct),
            Constraint::Percentage(results_pct),
        ])
        .split(outer[1]);

    vote_panel::render(frame, app, main[0]);
    results_panel::render(frame, app, main[1]);

    key_bar::render(frame, app, outer[2]);

    // ── Overlays (rendered last so they're on top) ──────────────────────
    if app.busy.is_visible() {
        overlay::render(frame, app);
    }
    if app.input_mode == InputMode::Help {
        help::render(frame);
    }
    toast::render(frame, app);
}

/// Compute a centered rectangle of `width` x `height` cells, clipped to
/// `area` (safe, no raw indexing).
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width,
        height,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::app::App;

    /// Render the whole UI into an off-screen buffer and return it as text,
    /// one string per row.
    pub fn render_rows(app: &App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| super::render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    pub fn screen_contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|row| row.contains(needle))
    }
}
