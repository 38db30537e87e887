//! Persistent key instruction bar at the bottom of the screen.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::config;
use crate::theme;

/// Render the key-hint bar into the given area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let spans = match app.input_mode {
        InputMode::Normal => normal_hints(app),
        InputMode::Help => help_hints(),
    };
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Key style: accented, bold.
fn key(s: String) -> Span<'static> {
    Span::styled(
        s,
        Style::default()
            .fg(theme::accent())
            .add_modifier(Modifier::BOLD),
    )
}

/// Description style: dimmed.
fn desc(s: &'static str) -> Span<'static> {
    Span::styled(s, Style::default().fg(theme::text_dim()))
}

fn sep() -> Span<'static> {
    Span::styled("  │  ", theme::dim())
}

fn normal_hints(app: &App) -> Vec<Span<'static>> {
    let kb = &config::get().keys;
    let mut hints = vec![
        Span::raw(" "),
        key(kb.vote_cats.to_string()),
        desc(" Cats "),
        key(kb.vote_dogs.to_string()),
        desc(" Dogs "),
        sep(),
        key(kb.refresh.to_string()),
        desc(" Refresh "),
        key(kb.toggle_refresh.to_string()),
    ];
    hints.push(desc(if app.auto_refresh {
        " Pause auto-refresh "
    } else {
        " Resume auto-refresh "
    }));
    hints.extend([
        sep(),
        key(kb.next_toast.to_string()),
        desc(" Next toast "),
        key(kb.dismiss.to_string()),
        desc(" Close toast "),
        key(kb.help.to_string()),
        desc(" Help "),
        key(kb.quit.to_string()),
        desc(" Quit "),
    ]);
    hints
}

fn help_hints() -> Vec<Span<'static>> {
    vec![Span::raw(" "), key("Esc".into()), desc(" Close help ")]
}
