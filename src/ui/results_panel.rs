//! Results panel: counts, percentages and proportional bars.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::results::OptionResult;
use crate::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Results ", theme::title()))
        .borders(Borders::ALL)
        .border_style(theme::border_inactive());

    let Some(view) = app.results.as_ref() else {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "  Waiting for results…",
            theme::dim(),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // spacer
            Constraint::Length(1), // cats label
            Constraint::Length(1), // cats bar
            Constraint::Length(1), // spacer
            Constraint::Length(1), // dogs label
            Constraint::Length(1), // dogs bar
            Constraint::Length(1), // spacer
            Constraint::Length(1), // total
            Constraint::Min(0),
        ])
        .split(inner);

    render_row(frame, &view.cats, chunks[1], chunks[2]);
    render_row(frame, &view.dogs, chunks[4], chunks[5]);

    let total = Line::from(vec![
        Span::styled("  Total votes: ", theme::dim()),
        Span::styled(view.total.as_str(), theme::title()),
    ]);
    frame.render_widget(Paragraph::new(total), chunks[7]);
}

fn render_row(frame: &mut Frame, row: &OptionResult, label_area: Rect, bar_area: Rect) {
    let color = theme::option_color(row.option);

    let label = Line::from(vec![
        Span::styled(format!("  {} ", row.option.emoji()), theme::text()),
        Span::styled(format!("{:<6}", row.option.display_name()), theme::text()),
        Span::styled(format!("{:>8} ", row.count), theme::title().fg(color)),
        Span::styled(format!("{:>5}", row.percent_label), theme::dim()),
    ]);
    frame.render_widget(Paragraph::new(label), label_area);

    let bar_area = Rect {
        x: bar_area.x + 2,
        width: bar_area.width.saturating_sub(4),
        ..bar_area
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .percent(row.bar_percent())
        .label(row.percent_label.as_str());
    frame.render_widget(gauge, bar_area);
}
