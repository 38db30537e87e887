//! The two voting cards.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::api::types::VoteOption;
use crate::app::{App, VoteControl};
use crate::config;
use crate::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (option, card) in VoteOption::ALL.into_iter().zip(cards.iter()) {
        render_card(frame, app, app.control(option), *card);
    }
}

fn render_card(frame: &mut Frame, app: &App, control: &VoteControl, area: Rect) {
    let option = control.option;
    let color = theme::option_color(option);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} {} ", option.emoji(), option.display_name()),
            theme::title().fg(color),
        ))
        .borders(Borders::ALL)
        .border_style(if control.is_enabled() {
            Style::default().fg(color)
        } else {
            theme::border_inactive()
        });

    let key = key_hint(option);
    let button = if control.is_enabled() && !app.busy.is_visible() {
        Span::styled(format!(" [{key}] {} ", control.label()), theme::button(option))
    } else {
        Span::styled(format!(" {} ", control.label()), theme::button_disabled())
    };

    let votes = app
        .results
        .as_ref()
        .map(|r| r.get(option).count.clone())
        .unwrap_or_else(|| "-".into());

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(tagline(option), theme::dim())).alignment(Alignment::Center),
        Line::from(""),
        Line::from(button).alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(format!("{votes} votes"), theme::text()))
            .alignment(Alignment::Center),
    ];

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn tagline(option: VoteOption) -> &'static str {
    match option {
        VoteOption::Cats => "Independent, curious, and purrfect.",
        VoteOption::Dogs => "Loyal, playful, and always happy to see you.",
    }
}

/// Human-readable name of the key bound to an option.
pub fn key_hint(option: VoteOption) -> String {
    let keys = &config::get().keys;
    let code = match option {
        VoteOption::Cats => keys.vote_cats,
        VoteOption::Dogs => keys.vote_dogs,
    };
    code.to_string()
}
