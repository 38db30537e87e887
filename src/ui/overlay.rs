//! Busy overlay shown while a vote is in flight.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear};
use ratatui::Frame;

use crate::app::App;
use crate::theme;

use super::{centered_rect, spinner};

pub fn render(frame: &mut Frame, app: &App) {
    let Some(message) = app.busy.message() else {
        return;
    };

    let area = centered_rect(36, 5, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::accent()))
        .title(Line::from(" Please wait ").centered());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line_area = Rect {
        y: inner.y + inner.height / 2,
        height: 1,
        ..inner
    };
    spinner::render(frame, app.tick_count, line_area, message);
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use crate::api::types::ApiEvent;
    use crate::app::App;
    use crate::ui::test_support::{render_rows, screen_contains};

    #[test]
    fn overlay_follows_busy_events() {
        let mut app = App::new();
        app.handle_api_event(ApiEvent::Busy(Some("Sending vote…".into())), Instant::now());
        assert!(screen_contains(&render_rows(&app, 80, 24), "Please wait"));

        app.handle_api_event(ApiEvent::Busy(None), Instant::now());
        assert!(!screen_contains(&render_rows(&app, 80, 24), "Please wait"));
    }
}
