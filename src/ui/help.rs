//! Help overlay: keybinding reference.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::config;
use crate::theme;

use super::centered_rect;

/// Render the help overlay.
pub fn render(frame: &mut Frame) {
    let area = centered_rect(56, 21, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(" Keybindings ", theme::title()))
        .borders(Borders::ALL)
        .border_style(theme::border_active());

    let kb = &config::get().keys;
    let sections = [
        (
            "Voting",
            vec![
                (kb.vote_cats.to_string(), "Vote for Cats"),
                (kb.vote_dogs.to_string(), "Vote for Dogs"),
            ],
        ),
        (
            "Results",
            vec![
                (kb.refresh.to_string(), "Refresh now"),
                (kb.toggle_refresh.to_string(), "Toggle auto-refresh"),
            ],
        ),
        (
            "Notifications",
            vec![
                (kb.next_toast.to_string(), "Select next notification"),
                (kb.focus_error.to_string(), "Select newest error"),
                (kb.dismiss.to_string(), "Close selected notification"),
            ],
        ),
        (
            "Other",
            vec![
                (kb.help.to_string(), "Toggle this help"),
                (kb.quit.to_string(), "Quit"),
            ],
        ),
    ];

    let mut lines = vec![Line::from("")];
    for (section, bindings) in &sections {
        lines.push(Line::from(Span::styled(
            format!("  ── {section} ──"),
            theme::title(),
        )));
        for (key, desc) in bindings {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("    {key:<12}"),
                    Style::default()
                        .fg(theme::accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(*desc, theme::text()),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled("  Press ESC or ? to close", theme::dim())));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
