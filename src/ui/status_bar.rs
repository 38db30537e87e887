//! Connection and polling status bar at the top of the screen.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::api::types::LifecycleState;
use crate::app::App;
use crate::config;
use crate::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" 🐾 Cats vs Dogs ", theme::title()),
        Span::styled("│ ", theme::dim()),
        Span::styled(format!("{} ", config::get().api.base_url), theme::text()),
        Span::styled("│ ", theme::dim()),
    ];

    // Controller lifecycle.
    match app.lifecycle {
        LifecycleState::Uninitialized => {
            let frame_char = theme::spinner_frame(app.tick_count);
            spans.push(Span::styled(format!("{frame_char} Connecting "), theme::dim()));
        }
        LifecycleState::Ready => spans.push(Span::styled("● Online ", theme::success())),
        LifecycleState::Failed => spans.push(Span::styled("✖ Offline ", theme::error())),
        LifecycleState::Closed => spans.push(Span::styled("○ Closed ", theme::dim())),
    }

    spans.push(Span::styled("│ ", theme::dim()));

    // Polling state with animated spinner.
    if app.auto_refresh && app.visible && app.lifecycle == LifecycleState::Ready {
        let frame_char = theme::spinner_frame(app.tick_count / 8);
        spans.push(Span::styled(
            format!("{frame_char} Auto-refresh: ON "),
            Style::default()
                .fg(theme::accent())
                .add_modifier(Modifier::BOLD),
        ));
    } else if app.auto_refresh {
        spans.push(Span::styled("⏸ Auto-refresh: PAUSED ", theme::dim()));
    } else {
        spans.push(Span::styled("⏸ Auto-refresh: OFF ", theme::dim()));
    }

    if !app.notifications.is_empty() {
        spans.push(Span::styled("│ ", theme::dim()));
        spans.push(Span::styled(
            format!("{} notifications", app.notifications.len()),
            theme::dim(),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(theme::border_active());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
