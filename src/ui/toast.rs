//! Toast stack in the top-right corner with slide-in animation.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::api::types::Severity;
use crate::app::App;
use crate::config;
use crate::notify::Notification;
use crate::theme;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 3;

/// Render every visible toast, newest on top.
pub fn render(frame: &mut Frame, app: &App) {
    let screen = frame.area();
    // Leave the status bar visible.
    let mut y = screen.y + 3;
    let selected = app.notifications.selected().map(|n| n.id);

    for toast in app.notifications.iter().rev() {
        if y + TOAST_HEIGHT > screen.bottom() {
            break;
        }
        let width = TOAST_WIDTH.min(screen.width);
        let target = Rect {
            x: screen.right().saturating_sub(width + 1),
            y,
            width,
            height: TOAST_HEIGHT,
        };
        let area = slide_from_right(target, screen, toast.slide);
        render_toast(frame, toast, area, selected == Some(toast.id));
        y += TOAST_HEIGHT;
    }
}

fn render_toast(frame: &mut Frame, toast: &Notification, area: Rect, selected: bool) {
    if area.width == 0 {
        return;
    }
    frame.render_widget(Clear, area);

    let color = theme::severity_color(toast.severity);
    let mut block = Block::default()
        .title(Span::styled(
            format!(" {} {} ", theme::severity_icon(toast.severity), title(toast.severity)),
            theme::title().fg(color),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    if selected {
        let hint = format!(" {} close ", config::get().keys.dismiss);
        block = block
            .border_type(BorderType::Thick)
            .title_bottom(Line::from(Span::styled(hint, theme::dim())).right_aligned());
    }

    let paragraph = Paragraph::new(Line::from(Span::styled(
        toast.message.as_str(),
        theme::text(),
    )))
    .block(block)
    .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn title(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "Success",
        Severity::Error => "Error",
        Severity::Warning => "Warning",
        Severity::Info => "Info",
    }
}

/// Slide a rect in from the right screen edge. `progress` is 0.0 → 1.0.
fn slide_from_right(target: Rect, screen: Rect, progress: f32) -> Rect {
    let progress = progress.clamp(0.0, 1.0);
    let travel = screen.right().saturating_sub(target.x);
    let offset = ((1.0 - progress) * travel as f32) as u16;
    let x = target.x.saturating_add(offset).min(screen.right());
    Rect {
        x,
        width: target.width.min(screen.right() - x),
        ..target
    }
}
