//! Layout components (content area, status bar)

use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::SubmitOutcome;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split off the bottom line for the status bar, returning the content area
pub fn create_layout(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    chunks[0]
}

fn outcome_color(outcome: Option<&SubmitOutcome>) -> Color {
    match outcome {
        Some(SubmitOutcome::Succeeded) => Color::Green,
        Some(SubmitOutcome::RetryScheduled { .. }) => Color::Yellow,
        Some(
            SubmitOutcome::Rejected { .. }
            | SubmitOutcome::Failed { .. }
            | SubmitOutcome::Unreachable { .. },
        ) => Color::Red,
        None => Color::Gray,
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let hints = format!(" Tab/↑↓:move  Enter:next  {SUBMIT_SHORTCUT}:submit  ^U:clear ");
    let mut spans = vec![Span::styled(hints, Style::default().fg(Color::Gray))];

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw("| "));
        spans.push(Span::styled(
            msg,
            Style::default().fg(outcome_color(app.state.last_outcome.as_ref())),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_hint = " Esc:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}
