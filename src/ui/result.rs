//! Results screen shown once the session has completed.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;

pub fn render<S, C>(frame: &mut Frame, area: Rect, app: &App<S, C>) {
    let chunks = Layout::vertical([
        Constraint::Percentage(20),
        Constraint::Length(16),
        Constraint::Percentage(20),
    ])
    .split(area);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
    ];

    if let Some(info) = app.controller.user_info() {
        content.push(Line::from(vec![
            Span::styled(info.name.clone(), Style::default().fg(Color::White).bold()),
            Span::styled(
                format!("  ·  {}  ·  {}", info.student_number, info.major),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        content.push(Line::from(""));
    }

    match app.controller.summary() {
        Some(summary) => {
            let grade_color = grade_color(summary.percentage);
            content.push(Line::from(Span::styled(
                format!(
                    "{} / {}  ({:.0}%)",
                    summary.correct_answers, summary.total_questions, summary.percentage
                ),
                Style::default().fg(grade_color).bold(),
            )));
            content.push(Line::from(""));
            content.push(Line::from(Span::styled(
                format!(
                    "{} incorrect  ·  finished in {}:{:02}",
                    summary.incorrect_answers,
                    summary.time_spent_secs / 60,
                    summary.time_spent_secs % 60
                ),
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => {
            content.push(Line::from(Span::styled(
                "Quiz completed",
                Style::default().fg(Color::Green).bold(),
            )));
            content.push(Line::from(""));
            content.push(Line::from(
                "No score is available for this session".fg(Color::DarkGray),
            ));
        }
    }

    content.push(Line::from(""));
    if let Some(err) = app.controller.submission_error() {
        content.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
    } else {
        content.push(Line::from(""));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "r restart  ·  q quit",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, chunks[1]);
}

fn grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}
