//! Quiz question screen with the live countdown.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::app::App;
use crate::models::Question;

/// Remaining seconds under which the countdown turns red.
const LOW_TIME_SECS: u64 = 60;

const OPTION_LABELS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

pub fn render<S, C>(frame: &mut Frame, area: Rect, app: &App<S, C>) {
    let Some(question) = app.controller.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header: progress + countdown
        Constraint::Length(5), // Question text
        Constraint::Fill(1),   // Options
        Constraint::Length(1), // Answered count
        Constraint::Length(1), // Controls
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app);
    render_question_text(frame, chunks[1], &question.text);
    render_options(frame, chunks[2], question, app);
    render_answered(frame, chunks[3], app);
    render_controls(frame, chunks[4]);
}

fn format_remaining(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn render_header<S, C>(frame: &mut Frame, area: Rect, app: &App<S, C>) {
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let progress = format!(
        "Question {} of {}",
        app.controller.current_index() + 1,
        app.controller.total_questions()
    );
    frame.render_widget(
        Paragraph::new(progress).fg(Color::DarkGray),
        halves[0],
    );

    let time_color = if app.remaining_secs < LOW_TIME_SECS {
        Color::Red
    } else {
        Color::Green
    };
    let countdown = Paragraph::new(format_remaining(app.remaining_secs))
        .alignment(Alignment::Right)
        .style(Style::default().fg(time_color).bold());
    frame.render_widget(countdown, halves[1]);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_options<S, C>(frame: &mut Frame, area: Rect, question: &Question, app: &App<S, C>) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.answers.len() * 2);

    for (index, option) in question.answers.iter().enumerate() {
        let is_selected = index == app.selected_option;
        let is_chosen = app.current_answer == Some(option.id);

        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if is_selected { ">" } else { " " };
        let marker = if is_chosen { "[x]" } else { "[ ]" };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", cursor), style),
            Span::styled(
                marker,
                if is_chosen {
                    Style::default().fg(Color::Green)
                } else {
                    style
                },
            ),
            Span::styled(format!(" {}. ", label), style),
            Span::styled(option.text.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn render_answered<S, C>(frame: &mut Frame, area: Rect, app: &App<S, C>) {
    let widget = Paragraph::new(format!(
        "{}/{} answered",
        app.answered_count,
        app.controller.total_questions()
    ))
    .alignment(Alignment::Right)
    .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget =
        Paragraph::new("j/k select  ·  enter answer  ·  n/p next/prev  ·  r restart  ·  q quit")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(600), "10:00");
        assert_eq!(format_remaining(61), "1:01");
        assert_eq!(format_remaining(9), "0:09");
        assert_eq!(format_remaining(0), "0:00");
    }
}
