//! Animated loading spinner widget.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme;

/// Spinner glyph followed by a label, as a single line.
pub fn line(tick: u64, label: &str) -> Line<'_> {
    let spinner_char = theme::spinner_frame(tick);
    Line::from(vec![
        Span::styled(
            format!(" {spinner_char} "),
            Style::default()
                .fg(theme::accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(label, theme::text()),
    ])
}

/// Render a spinner at the given area.
pub fn render(frame: &mut Frame, tick: u64, area: Rect, label: &str) {
    frame.render_widget(Paragraph::new(line(tick, label)), area);
}
