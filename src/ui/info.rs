//! User info entry form.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, INFO_FIELD_LABELS};

pub fn render<S, C>(frame: &mut Frame, area: Rect, app: &App<S, C>) {
    let chunks = Layout::vertical([
        Constraint::Percentage(25),
        Constraint::Length(17),
        Constraint::Percentage(25),
    ])
    .split(area);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "TIMED QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from("10 minutes once you start".fg(Color::DarkGray)),
        Line::from(""),
    ];

    for (index, label) in INFO_FIELD_LABELS.iter().enumerate() {
        let focused = index == app.form.focus;
        let label_style = if focused {
            Style::default().fg(Color::White).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let value_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if focused { "_" } else { "" };

        content.push(Line::from(vec![
            Span::styled(format!("{:>16}: ", label), label_style),
            Span::styled(app.form.fields[index].clone(), value_style),
            Span::styled(cursor, Style::default().fg(Color::Yellow)),
        ]));
        content.push(Line::from(""));
    }

    if let Some(err) = &app.form.error {
        content.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        content.push(Line::from(""));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "Tab next field  ·  Enter start  ·  Esc quit",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, chunks[1]);
}
