//! Terminal views for each quiz step.

mod info;
mod quiz;
mod result;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::session::Step;

pub fn render<S, C>(frame: &mut Frame, app: &App<S, C>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    if app.controller.is_submitting() {
        render_submitting(frame, area);
        return;
    }

    match app.controller.step() {
        Step::Info => info::render(frame, area, app),
        Step::Quiz => quiz::render(frame, area, app),
        Step::Results => result::render(frame, area, app),
    }
}

fn render_submitting(frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(5),
        Constraint::Percentage(40),
    ])
    .split(area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Submitting your answers...",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(""),
    ];

    let widget = ratatui::widgets::Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}
